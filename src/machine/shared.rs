//! Thread-shared handle around a [`StateMachine`].

use crate::core::{ActionId, Condition, EntryCallback, StateId};
use crate::machine::error::FsmError;
use crate::machine::machine::StateMachine;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle that serializes every operation on one machine.
///
/// All tables of the machine sit behind a single lock, so `advance` and
/// `evaluate_conditional` read-modify-write the current state atomically and
/// a gate check always sees a fully committed state.
///
/// # Deadlocks
///
/// Conditions and entry callbacks run while the lock is held. They must not
/// call back into the same `SharedMachine`.
#[derive(Clone, Debug, Default)]
pub struct SharedMachine {
    inner: Arc<Mutex<StateMachine>>,
}

impl SharedMachine {
    pub fn new(machine: StateMachine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(machine)),
        }
    }

    pub fn initialize<I>(&self, states: I) -> Result<(), FsmError>
    where
        I: IntoIterator<Item = StateId>,
    {
        self.inner.lock().initialize(states)
    }

    pub fn current_state(&self) -> StateId {
        self.inner.lock().current_state()
    }

    pub fn advance(&self) -> Result<(), FsmError> {
        self.inner.lock().advance()
    }

    pub fn evaluate_conditional(&self) -> Result<bool, FsmError> {
        self.inner.lock().evaluate_conditional()
    }

    pub fn settle(&self) -> Result<usize, FsmError> {
        self.inner.lock().settle()
    }

    pub fn allow(&self, state: StateId, action: impl Into<ActionId>) -> Result<(), FsmError> {
        self.inner.lock().allow(state, action)
    }

    pub fn is_allowed(&self, state: StateId, action: impl Into<ActionId>) -> bool {
        self.inner.lock().is_allowed(state, action)
    }

    pub fn check_and_enter(&self, action: impl Into<ActionId>) -> Result<(), FsmError> {
        self.inner.lock().check_and_enter(action)
    }

    pub fn set_callback(&self, state: StateId, callback: EntryCallback) -> Result<(), FsmError> {
        self.inner.lock().set_callback(state, callback)
    }

    pub fn set_conditional(
        &self,
        state: StateId,
        target: StateId,
        condition: Condition,
    ) -> Result<(), FsmError> {
        self.inner.lock().set_conditional(state, target, condition)
    }

    /// Settle pending conditional transitions, check the gate for `action`
    /// and run `body`, all under one lock acquisition.
    ///
    /// `body` never runs if settling fails or the gate rejects the action.
    /// The state cannot change between the check and the end of `body`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use waypoint::{Condition, SharedMachine, StateId};
    ///
    /// const OPEN: StateId = StateId::from_name("OPEN");
    /// const CLOSED: StateId = StateId::from_name("CLOSED");
    ///
    /// let shared = SharedMachine::default();
    /// shared.initialize([OPEN, CLOSED]).unwrap();
    /// shared.allow(CLOSED, "refund").unwrap();
    /// shared.set_conditional(OPEN, CLOSED, Condition::always()).unwrap();
    ///
    /// assert_eq!(shared.perform("refund", || 42), Ok(42));
    /// assert_eq!(shared.current_state(), CLOSED);
    /// ```
    pub fn perform<T, F>(&self, action: impl Into<ActionId>, body: F) -> Result<T, FsmError>
    where
        F: FnOnce() -> T,
    {
        let mut machine = self.inner.lock();
        machine.settle()?;
        machine.gated(action, body)
    }

    /// Run `f` with exclusive access to the machine.
    pub fn with<R>(&self, f: impl FnOnce(&mut StateMachine) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl From<StateMachine> for SharedMachine {
    fn from(machine: StateMachine) -> Self {
        SharedMachine::new(machine)
    }
}
