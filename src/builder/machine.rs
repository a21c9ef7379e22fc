//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{ActionId, Condition, EntryCallback, StateId};
use crate::machine::StateMachine;

/// Builder for constructing an initialized state machine with a fluent API.
///
/// Rules are applied after the sequence is set, so conditional targets are
/// validated against it.
pub struct MachineBuilder {
    states: Vec<StateId>,
    allowed: Vec<(StateId, ActionId)>,
    callbacks: Vec<(StateId, EntryCallback)>,
    conditionals: Vec<(StateId, StateId, Condition)>,
    record_history: bool,
}

impl MachineBuilder {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            allowed: Vec::new(),
            callbacks: Vec::new(),
            conditionals: Vec::new(),
            record_history: true,
        }
    }

    /// Append states to the sequence, in order (required).
    pub fn states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = StateId>,
    {
        self.states.extend(states);
        self
    }

    /// Permit `action` in `state`.
    pub fn allow(mut self, state: StateId, action: impl Into<ActionId>) -> Self {
        self.allowed.push((state, action.into()));
        self
    }

    /// Permit `action` in every listed state.
    pub fn allow_in<I>(mut self, states: I, action: impl Into<ActionId>) -> Self
    where
        I: IntoIterator<Item = StateId>,
    {
        let action = action.into();
        for state in states {
            self.allowed.push((state, action.clone()));
        }
        self
    }

    /// Run `hook` whenever `state` is entered through a transition.
    pub fn on_enter<F>(self, state: StateId, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.callback(state, EntryCallback::new(hook))
    }

    /// Register a prebuilt entry callback.
    pub fn callback(mut self, state: StateId, callback: EntryCallback) -> Self {
        self.callbacks.push((state, callback));
        self
    }

    /// Jump from `state` to `target` once `predicate` holds.
    pub fn when<F>(self, state: StateId, target: StateId, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.conditional(state, target, Condition::new(predicate))
    }

    /// Register a prebuilt conditional rule.
    pub fn conditional(mut self, state: StateId, target: StateId, condition: Condition) -> Self {
        self.conditionals.push((state, target, condition));
        self
    }

    /// Record transition history (default: on).
    pub fn record_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    /// Build and initialize the machine.
    ///
    /// The sequence is validated first; rules are registered afterwards, so
    /// conditional targets are checked against it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use waypoint::{state_ids, MachineBuilder};
    ///
    /// state_ids! { PENDING, PAID, SHIPPED }
    ///
    /// let mut machine = MachineBuilder::new()
    ///     .states([PENDING, PAID, SHIPPED])
    ///     .allow(PAID, "ship")
    ///     .build()
    ///     .unwrap();
    ///
    /// machine.advance().unwrap();
    /// assert!(machine.check_and_enter("ship").is_ok());
    /// ```
    pub fn build(self) -> Result<StateMachine, BuildError> {
        if self.states.is_empty() {
            return Err(BuildError::MissingStates);
        }

        let mut machine = StateMachine::new();
        machine.set_record_history(self.record_history);
        machine.initialize(self.states)?;

        for (state, action) in self.allowed {
            machine.allow(state, action)?;
        }
        for (state, callback) in self.callbacks {
            machine.set_callback(state, callback)?;
        }
        for (state, target, condition) in self.conditionals {
            machine.set_conditional(state, target, condition)?;
        }

        Ok(machine)
    }
}

impl Default for MachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
