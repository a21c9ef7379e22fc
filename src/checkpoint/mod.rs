//! Checkpoint and restore for state machines.
//!
//! A checkpoint captures the data tables of a machine: the state sequence,
//! the current state, the action gate and the transition history. Conditions
//! and entry callbacks are code, not data; after a restore the host registers
//! them again.

use crate::core::{ActionId, StateHistory, StateId};
use crate::machine::registry::Registry;
use crate::machine::{ActionGate, FsmError, StateMachine, StateSequence};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// State sequence; empty when the machine was never initialized
    pub states: Vec<StateId>,

    /// Current state, the zero id when uninitialized
    pub current_state: StateId,

    /// Every `(state, action)` permission
    pub allowed: Vec<(StateId, ActionId)>,

    /// Complete transition history
    pub history: StateHistory,

    /// Whether the machine records new transitions
    pub record_history: bool,
}

impl Checkpoint {
    /// Encode as pretty-printed JSON.
    ///
    /// # Example
    ///
    /// ```rust
    /// use waypoint::{Checkpoint, StateId, StateMachine};
    ///
    /// const DRAFT: StateId = StateId::from_name("DRAFT");
    /// const LIVE: StateId = StateId::from_name("LIVE");
    ///
    /// let mut machine = StateMachine::new();
    /// machine.initialize([DRAFT, LIVE]).unwrap();
    /// machine.advance().unwrap();
    ///
    /// let json = machine.checkpoint().to_json().unwrap();
    /// let restored = StateMachine::restore(Checkpoint::from_json(&json).unwrap()).unwrap();
    /// assert_eq!(restored.current_state(), LIVE);
    /// ```
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self).map_err(|e| CheckpointError::encode("json", e))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::decode("json", e))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::encode("bincode", e))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes).map_err(|e| CheckpointError::decode("bincode", e))
    }
}

impl StateMachine {
    /// Snapshot the data tables of the machine.
    pub fn checkpoint(&self) -> Checkpoint {
        let checkpoint = Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            states: self
                .states()
                .map(|s| s.as_slice().to_vec())
                .unwrap_or_default(),
            current_state: self.current_state(),
            allowed: self
                .gate
                .entries()
                .map(|(state, action)| (state, action.clone()))
                .collect(),
            history: self.history.clone(),
            record_history: self.records_history(),
        };
        debug!(id = %checkpoint.id, current = %checkpoint.current_state, "checkpoint taken");
        checkpoint
    }

    /// Rebuild a machine from a checkpoint.
    ///
    /// The sequence is validated again and the current state must belong to
    /// it. Conditions and entry callbacks are not part of a checkpoint and
    /// have to be registered on the returned machine.
    pub fn restore(checkpoint: Checkpoint) -> Result<Self, CheckpointError> {
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: checkpoint.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        let registry = if checkpoint.states.is_empty() {
            if !checkpoint.current_state.is_unset() {
                return Err(FsmError::UnknownState {
                    state: checkpoint.current_state,
                }
                .into());
            }
            Registry::Uninitialized
        } else {
            let sequence = StateSequence::new(checkpoint.states)?;
            Registry::at(sequence, checkpoint.current_state)?
        };

        let mut machine = StateMachine::new();
        machine.registry = registry;
        machine.gate = checkpoint.allowed.into_iter().collect::<ActionGate>();
        machine.history = checkpoint.history;
        machine.set_record_history(checkpoint.record_history);
        debug!(id = %checkpoint.id, current = %machine.current_state(), "checkpoint restored");
        Ok(machine)
    }
}
