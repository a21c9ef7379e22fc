//! Validated, ordered state sequences.

use crate::core::StateId;
use crate::machine::error::FsmError;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Ordered list of unique, non-zero states.
///
/// A value of this type always holds at least one state, never holds the
/// reserved zero id and never holds the same id twice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateSequence {
    states: Vec<StateId>,
}

impl StateSequence {
    /// Validate `states` and wrap them.
    ///
    /// When the input has several problems the one at the earliest position
    /// is returned. Use [`StateSequence::violations`] to see all of them.
    pub fn new(states: Vec<StateId>) -> Result<Self, FsmError> {
        match Self::violations(&states) {
            Validation::Success(_) => Ok(Self { states }),
            Validation::Failure(errors) => Err(errors.head().clone()),
        }
    }

    /// Check `states`, accumulating every violation in position order.
    ///
    /// A zero entry is reported as `ZeroStateId` only, even when it repeats.
    pub fn violations(states: &[StateId]) -> Validation<(), NonEmptyVec<FsmError>> {
        if states.is_empty() {
            return Validation::fail(FsmError::EmptySequence);
        }

        let mut seen: HashMap<StateId, usize> = HashMap::with_capacity(states.len());
        let checks: Vec<Validation<(), NonEmptyVec<FsmError>>> = states
            .iter()
            .enumerate()
            .map(|(position, state)| {
                if state.is_unset() {
                    return Validation::fail(FsmError::ZeroStateId { position });
                }
                match seen.entry(*state) {
                    Entry::Occupied(entry) => Validation::fail(FsmError::DuplicateState {
                        state: *state,
                        first: *entry.get(),
                        position,
                    }),
                    Entry::Vacant(entry) => {
                        entry.insert(position);
                        Validation::success(())
                    }
                }
            })
            .collect();

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the sequence has no states; `false` for every validated sequence.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn first(&self) -> StateId {
        self.states[0]
    }

    pub fn last(&self) -> StateId {
        self.states[self.states.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<StateId> {
        self.states.get(index).copied()
    }

    /// Index of `state` in sequence order.
    pub fn position(&self, state: StateId) -> Option<usize> {
        self.states.iter().position(|s| *s == state)
    }

    pub fn contains(&self, state: StateId) -> bool {
        self.position(state).is_some()
    }

    pub fn as_slice(&self) -> &[StateId] {
        &self.states
    }

    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.iter().copied()
    }
}
