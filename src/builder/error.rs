//! Build errors for the machine builder.

use crate::machine::FsmError;
use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("No states specified. Call .states(..) before .build()")]
    MissingStates,

    #[error(transparent)]
    Machine(#[from] FsmError),
}
