//! Conditional transition rules and entry callbacks, keyed by state.

use crate::core::{Condition, EntryCallback, StateId};
use std::collections::HashMap;

/// Auto-transition rule attached to one state.
#[derive(Clone, Debug)]
pub struct ConditionalRule {
    pub target: StateId,
    pub condition: Condition,
}

/// Host-supplied hooks: at most one conditional rule and one entry callback
/// per state. Registering again replaces the previous entry.
#[derive(Clone, Debug, Default)]
pub(crate) struct Rules {
    conditionals: HashMap<StateId, ConditionalRule>,
    callbacks: HashMap<StateId, EntryCallback>,
}

impl Rules {
    pub(crate) fn set_conditional(&mut self, state: StateId, rule: ConditionalRule) {
        self.conditionals.insert(state, rule);
    }

    pub(crate) fn conditional(&self, state: StateId) -> Option<&ConditionalRule> {
        self.conditionals.get(&state)
    }

    pub(crate) fn set_callback(&mut self, state: StateId, callback: EntryCallback) {
        self.callbacks.insert(state, callback);
    }

    pub(crate) fn callback(&self, state: StateId) -> Option<&EntryCallback> {
        self.callbacks.get(&state)
    }
}
