//! Per-state action permissions.

use crate::core::{ActionId, StateId};
use std::collections::{BTreeMap, BTreeSet};

/// Table of which actions may run in which state.
///
/// Entries are only ever added. An action that was never allowed for a state
/// is rejected in that state. Entries for states outside the sequence are
/// accepted and simply never match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionGate {
    allowed: BTreeMap<StateId, BTreeSet<ActionId>>,
}

impl ActionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Permit `action` while the machine is in `state`.
    ///
    /// Returns `false` when the permission already existed.
    pub fn allow(&mut self, state: StateId, action: ActionId) -> bool {
        self.allowed.entry(state).or_default().insert(action)
    }

    pub fn is_allowed(&self, state: StateId, action: &ActionId) -> bool {
        self.allowed
            .get(&state)
            .is_some_and(|actions| actions.contains(action))
    }

    /// Actions permitted in `state`, in sorted order.
    pub fn actions_for(&self, state: StateId) -> impl Iterator<Item = &ActionId> + '_ {
        self.allowed.get(&state).into_iter().flatten()
    }

    /// Every `(state, action)` permission, sorted by state then action.
    pub fn entries(&self) -> impl Iterator<Item = (StateId, &ActionId)> + '_ {
        self.allowed
            .iter()
            .flat_map(|(state, actions)| actions.iter().map(move |a| (*state, a)))
    }

    pub fn len(&self) -> usize {
        self.allowed.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<(StateId, ActionId)> for ActionGate {
    fn from_iter<I: IntoIterator<Item = (StateId, ActionId)>>(iter: I) -> Self {
        let mut gate = ActionGate::new();
        for (state, action) in iter {
            gate.allow(state, action);
        }
        gate
    }
}
