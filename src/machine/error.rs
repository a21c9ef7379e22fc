//! Errors raised by machine operations.

use crate::core::{ActionId, HookError, StateId};
use thiserror::Error;

/// Errors that can occur while initializing, transitioning or gating.
///
/// All of them are caller-input or sequencing errors; none is transient and
/// retrying the same call against the same machine fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    #[error("State sequence already initialized")]
    AlreadyInitialized,

    #[error("State sequence must contain at least one state")]
    EmptySequence,

    #[error("Reserved zero state id at position {position}")]
    ZeroStateId { position: usize },

    #[error("State '{state}' appears at positions {first} and {position}")]
    DuplicateState {
        state: StateId,
        first: usize,
        position: usize,
    },

    #[error("No next state after '{current}'")]
    NoNextState { current: StateId },

    #[error("Action '{action}' is not allowed in state '{state}'")]
    ActionNotAllowed { state: StateId, action: ActionId },

    #[error("The reserved zero state id cannot take part in a conditional rule")]
    ReservedStateId,

    #[error("State '{state}' is not part of the state sequence")]
    UnknownState { state: StateId },

    #[error("Conditional transition from '{from}' to '{to}' does not move forward")]
    BackwardTransition { from: StateId, to: StateId },

    #[error("Condition for state '{state}' failed: {source}")]
    ConditionFailed { state: StateId, source: HookError },

    #[error("Entry callback for state '{state}' failed: {source}")]
    CallbackFailed { state: StateId, source: HookError },
}
