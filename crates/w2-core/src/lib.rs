//! w2-core: stable foundation for the World2 engine.
//!
//! Contains:
//! - numeric (Real + float helpers)
//! - time_grid (the fixed-step year grid every run is aligned with)
//! - params (model constants and initial conditions)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod params;
pub mod time_grid;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use params::{InitialConditions, ModelConstants};
pub use time_grid::TimeGrid;
