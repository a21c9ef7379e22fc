//! Builder API for ergonomic state machine construction.
//!
//! This module provides a fluent builder and the `state_ids!` macro for
//! setting up a machine with its gates, callbacks and conditional rules in
//! one expression.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::MachineBuilder;
