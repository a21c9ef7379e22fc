//! Error type returned by host-supplied predicates and callbacks.

use thiserror::Error;

/// Failure raised inside a [`Condition`](super::Condition) or an
/// [`EntryCallback`](super::EntryCallback).
///
/// The machine never inspects it; it is wrapped into the matching
/// [`FsmError`](crate::machine::FsmError) variant and handed back to the
/// caller of the transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for HookError {
    fn from(message: &str) -> Self {
        HookError::new(message)
    }
}

impl From<String> for HookError {
    fn from(message: String) -> Self {
        HookError::new(message)
    }
}
