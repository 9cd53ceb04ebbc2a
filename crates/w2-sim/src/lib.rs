//! Fixed-step World2 simulation.
//!
//! Provides:
//! - the closed set of simulated quantities and their per-step storage
//! - a phase-ordered builder producing an immutable run configuration
//! - the step engine: initialization at index 0, then a strictly sequential
//!   forward-Euler recurrence over the time grid

pub mod builder;
pub mod engine;
pub mod error;
pub mod quantity;
pub mod store;

// Re-exports for public API
pub use builder::{BuildPhase, ModelBuilder, RunConfig};
pub use engine::{RunOutput, RunStatus, Simulation};
pub use error::{SimError, SimResult};
pub use quantity::Quantity;
pub use store::{Sample, StateStore};
