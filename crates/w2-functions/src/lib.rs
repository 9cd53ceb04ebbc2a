//! Functional relationships of the World2 model.
//!
//! The model's nonlinear relationships are piecewise-linear lookup tables
//! and its policy levers are two-valued switches of time. Both are small,
//! immutable and side-effect free so they can be evaluated anywhere in a
//! step without ordering concerns of their own.
//!
//! # Design Principles
//!
//! - **Closed name sets**: every table and switch the engine consults has a
//!   variant in [`TableName`] / [`SwitchName`]; textual names are parsed once
//!   and unknown names are rejected.
//! - **Validated at construction**: malformed breakpoints never reach a run.
//! - **Fully bound**: a [`FunctionSet`] can only be built when every name is
//!   bound, so lookups during a run cannot fail on a missing function.

pub mod error;
pub mod names;
pub mod set;
pub mod switch;
pub mod table;

pub use error::{FunctionError, FunctionResult};
pub use names::{SwitchName, TableName};
pub use set::{FunctionSet, FunctionSetBuilder};
pub use switch::SwitchFunction;
pub use table::TableFunction;
