//! One-time state registry and the cursor into it.

use crate::core::StateId;
use crate::machine::error::FsmError;
use crate::machine::sequence::StateSequence;

/// The state sequence together with the current position in it.
///
/// Before initialization there is neither a sequence nor a current state, so
/// "initialized but empty" cannot be represented.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Registry {
    #[default]
    Uninitialized,
    Initialized {
        sequence: StateSequence,
        cursor: usize,
    },
}

impl Registry {
    /// Validate and commit `states`, landing on the first one.
    ///
    /// Nothing is committed unless every check passes.
    pub(crate) fn initialize(&mut self, states: Vec<StateId>) -> Result<StateId, FsmError> {
        if self.is_initialized() {
            return Err(FsmError::AlreadyInitialized);
        }

        let sequence = StateSequence::new(states)?;
        let first = sequence.first();
        *self = Registry::Initialized {
            sequence,
            cursor: 0,
        };
        Ok(first)
    }

    /// Restore a registry at an arbitrary position.
    pub(crate) fn at(sequence: StateSequence, current: StateId) -> Result<Self, FsmError> {
        let cursor = sequence
            .position(current)
            .ok_or(FsmError::UnknownState { state: current })?;
        Ok(Registry::Initialized { sequence, cursor })
    }

    pub(crate) fn is_initialized(&self) -> bool {
        matches!(self, Registry::Initialized { .. })
    }

    pub(crate) fn sequence(&self) -> Option<&StateSequence> {
        match self {
            Registry::Uninitialized => None,
            Registry::Initialized { sequence, .. } => Some(sequence),
        }
    }

    /// Current state, or the zero sentinel before initialization.
    pub(crate) fn current(&self) -> StateId {
        match self {
            Registry::Uninitialized => StateId::UNSET,
            Registry::Initialized { sequence, cursor } => sequence.as_slice()[*cursor],
        }
    }

    pub(crate) fn next(&self) -> Option<StateId> {
        match self {
            Registry::Uninitialized => None,
            Registry::Initialized { sequence, cursor } => sequence.get(cursor + 1),
        }
    }

    /// Move the cursor one step forward, returning the new state.
    pub(crate) fn advance(&mut self) -> Result<StateId, FsmError> {
        let current = self.current();
        match self {
            Registry::Initialized { sequence, cursor } if *cursor + 1 < sequence.len() => {
                *cursor += 1;
                Ok(sequence.as_slice()[*cursor])
            }
            _ => Err(FsmError::NoNextState { current }),
        }
    }

    /// Check that `target` is a later state than the current one.
    pub(crate) fn check_jump(&self, target: StateId) -> Result<usize, FsmError> {
        let Registry::Initialized { sequence, cursor } = self else {
            return Err(FsmError::UnknownState { state: target });
        };
        let index = sequence
            .position(target)
            .ok_or(FsmError::UnknownState { state: target })?;
        if index <= *cursor {
            return Err(FsmError::BackwardTransition {
                from: sequence.as_slice()[*cursor],
                to: target,
            });
        }
        Ok(index)
    }

    /// Jump forward to `target`, which may be any later state.
    pub(crate) fn jump_to(&mut self, target: StateId) -> Result<(), FsmError> {
        let index = self.check_jump(target)?;
        if let Registry::Initialized { cursor, .. } = self {
            *cursor = index;
        }
        Ok(())
    }
}
