use proptest::prelude::*;
use w2_core::{InitialConditions, ModelConstants, TimeGrid};
use w2_sim::{ModelBuilder, Quantity, Sample, Simulation, StateStore};

fn run(year_max: f64, dt: f64) -> StateStore {
    let functions = w2_scenario::default_function_set().unwrap();
    let mut builder = ModelBuilder::new(TimeGrid::new(1900.0, year_max, dt).unwrap());
    builder
        .set_constants(ModelConstants::default())
        .unwrap()
        .set_initial_conditions(InitialConditions::default())
        .unwrap()
        .bind_tables(functions.tables().cloned())
        .unwrap()
        .bind_switches(functions.switches().cloned())
        .unwrap();
    let mut sim = Simulation::new(builder.build().unwrap());
    sim.run().unwrap();
    sim.into_output().unwrap().store
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn longer_horizon_shares_every_earlier_sample(
        short in 1900.0_f64..1960.0,
        extra in 0.0_f64..60.0,
        dt in prop::sample::select(vec![0.1, 0.2, 0.25, 0.5, 1.0]),
    ) {
        let a = run(short, dt);
        let b = run(short + extra, dt);
        prop_assert!(b.len() >= a.len());
        for q in Quantity::ALL {
            for k in 0..a.len() {
                prop_assert_eq!(a.sample(q, k), b.sample(q, k));
            }
        }
    }

    #[test]
    fn only_lookback_flows_are_missing_at_step_zero(
        year_max in 1900.0_f64..1930.0,
        dt in prop::sample::select(vec![0.1, 0.2, 0.5, 1.0]),
    ) {
        let store = run(year_max, dt);
        for q in Quantity::ALL {
            let first = store.sample(q, 0).unwrap();
            prop_assert_eq!(first == Sample::NotApplicable, q.is_lookback_flow());
            for k in 1..store.len() {
                prop_assert!(store.value(q, k).is_some());
            }
        }
    }
}
