use w2_core::{InitialConditions, ModelConstants, TimeGrid, relatively_close};
use w2_sim::{ModelBuilder, Quantity, RunConfig, Sample, SimError, Simulation, StateStore};

const REL_TOL: f64 = 1e-10;

fn standard_config(year_max: f64) -> RunConfig {
    let functions = w2_scenario::default_function_set().unwrap();
    let grid = TimeGrid::new(1900.0, year_max, 0.2).unwrap();
    let mut builder = ModelBuilder::new(grid);
    builder
        .set_constants(ModelConstants::default())
        .unwrap()
        .set_initial_conditions(InitialConditions::default())
        .unwrap()
        .bind_tables(functions.tables().cloned())
        .unwrap()
        .bind_switches(functions.switches().cloned())
        .unwrap();
    builder.build().unwrap()
}

fn run(config: RunConfig) -> StateStore {
    let mut sim = Simulation::new(config);
    sim.run().unwrap();
    sim.into_output().unwrap().store
}

#[test]
fn standard_run_matches_reference_final_values() {
    let store = run(standard_config(2100.0));
    assert_eq!(store.len(), 1001);

    let expected = [
        (Quantity::QualityOfLife, 0.54940464789),
        (Quantity::PollutionRatio, 2.58741372815),
        (Quantity::NaturalResources, 278240023740.0),
        (Quantity::CapitalInvestment, 6010240430.13),
    ];
    for (quantity, reference) in expected {
        let actual = store.last_value(quantity).unwrap();
        assert!(
            relatively_close(actual, reference, REL_TOL),
            "{quantity}: {actual} vs {reference}"
        );
    }
}

#[test]
fn identical_configurations_give_identical_runs() {
    let a = run(standard_config(2000.0));
    let b = run(standard_config(2000.0));
    for q in Quantity::ALL {
        let (sa, sb) = (a.values_or_nan(q), b.values_or_nan(q));
        assert_eq!(sa.len(), sb.len());
        for (x, y) in sa.iter().zip(&sb) {
            assert!(x == y || (x.is_nan() && y.is_nan()), "{q} differs");
        }
    }
}

#[test]
fn extending_the_horizon_keeps_the_prefix() {
    let short = run(standard_config(2100.0));
    let long = run(standard_config(2300.0));
    assert!(long.len() > short.len());
    for q in Quantity::ALL {
        for k in 0..short.len() {
            assert_eq!(short.sample(q, k), long.sample(q, k), "{q} at {k}");
        }
    }
}

#[test]
fn step_zero_lookback_flows_are_not_applicable() {
    let store = run(standard_config(1910.0));
    for q in Quantity::ALL {
        let sample = store.sample(q, 0).unwrap();
        if q.is_lookback_flow() {
            assert_eq!(sample, Sample::NotApplicable, "{q}");
        } else {
            assert!(matches!(sample, Sample::Value(_)), "{q}");
        }
    }
    for k in 1..store.len() {
        for q in Quantity::ALL {
            assert!(store.value(q, k).is_some(), "{q} at {k}");
        }
    }
}

#[test]
fn standard_run_initial_ratios() {
    let store = run(standard_config(1900.2));
    assert_eq!(store.value(Quantity::NaturalResourceFractionRemaining, 0), Some(1.0));
    assert_eq!(store.value(Quantity::CrowdingRatio, 0), Some(1.65e9 / (135e6 * 26.5)));
    assert_eq!(store.value(Quantity::PollutionRatio, 0), Some(0.2e9 / 3.6e9));
}

#[test]
fn incomplete_function_set_is_rejected_before_running() {
    let functions = w2_scenario::default_function_set().unwrap();
    let grid = TimeGrid::new(1900.0, 2100.0, 0.2).unwrap();
    let mut builder = ModelBuilder::new(grid);
    builder
        .set_constants(ModelConstants::default())
        .unwrap()
        .set_initial_conditions(InitialConditions::default())
        .unwrap();
    let err = builder
        .bind_tables(functions.tables().skip(1).cloned())
        .unwrap_err();
    assert!(matches!(err, SimError::Configuration { .. }));
}
