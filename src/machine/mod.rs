//! The guarded state machine engine.
//!
//! # Key Concepts
//!
//! - **Registry**: the ordered state sequence, set exactly once
//! - **Transitions**: linear `advance` and predicate-driven conditional jumps
//! - **Gate**: per-state permissions checked at the start of guarded actions
//! - **Entry callbacks**: hooks fired after a transition has been committed
//!
//! Conditional transitions are pull-based. A condition usually depends on
//! state the machine cannot observe, so the host calls
//! [`StateMachine::evaluate_conditional`] (or [`StateMachine::settle`]) after
//! any event that might flip one.

mod error;
mod gate;
#[allow(clippy::module_inception)]
mod machine;
pub(crate) mod registry;
mod rules;
mod sequence;
mod shared;

pub use error::FsmError;
pub use gate::ActionGate;
pub use machine::StateMachine;
pub use rules::ConditionalRule;
pub use sequence::StateSequence;
pub use shared::SharedMachine;
