//! Checkpoint error types.

use crate::machine::FsmError;
use thiserror::Error;

/// Errors that can occur while encoding, decoding or restoring a checkpoint
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Failed to encode checkpoint as {format}: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },

    #[error("Failed to decode {format} checkpoint: {message}")]
    Decode {
        format: &'static str,
        message: String,
    },

    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The snapshot does not describe a machine that could have existed
    #[error("Invalid checkpoint: {0}")]
    Invalid(#[from] FsmError),
}

impl CheckpointError {
    pub(crate) fn encode(format: &'static str, err: impl std::fmt::Display) -> Self {
        CheckpointError::Encode {
            format,
            message: err.to_string(),
        }
    }

    pub(crate) fn decode(format: &'static str, err: impl std::fmt::Display) -> Self {
        CheckpointError::Decode {
            format,
            message: err.to_string(),
        }
    }
}
