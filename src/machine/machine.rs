//! The guarded state machine.

use crate::core::{
    ActionId, Condition, EntryCallback, StateHistory, StateId, StateTransition, TransitionKind,
};
use crate::machine::error::FsmError;
use crate::machine::gate::ActionGate;
use crate::machine::registry::Registry;
use crate::machine::rules::{ConditionalRule, Rules};
use crate::machine::sequence::StateSequence;
use tracing::{debug, trace, warn};

/// Linear state machine with per-state action gates, conditional jumps and
/// entry callbacks.
///
/// The machine is meant to be owned by the component it guards. Every
/// mutating operation takes `&mut self` and runs to completion before
/// returning; wrap it in a [`SharedMachine`](crate::SharedMachine) when the
/// host is genuinely concurrent.
///
/// # Example
///
/// ```rust
/// use waypoint::{FsmError, StateId, StateMachine};
///
/// const OPEN: StateId = StateId::from_name("OPEN");
/// const CLOSED: StateId = StateId::from_name("CLOSED");
///
/// let mut machine = StateMachine::new();
/// machine.allow(OPEN, "buy")?;
/// machine.initialize([OPEN, CLOSED])?;
///
/// assert!(machine.check_and_enter("buy").is_ok());
///
/// machine.advance()?;
/// assert_eq!(machine.current_state(), CLOSED);
/// assert!(matches!(
///     machine.check_and_enter("buy"),
///     Err(FsmError::ActionNotAllowed { .. })
/// ));
/// # Ok::<(), FsmError>(())
/// ```
#[derive(Clone, Debug)]
pub struct StateMachine {
    pub(crate) registry: Registry,
    pub(crate) gate: ActionGate,
    rules: Rules,
    pub(crate) history: StateHistory,
    record_history: bool,
}

impl StateMachine {
    /// Create an uninitialized machine that records its transition history.
    pub fn new() -> Self {
        Self {
            registry: Registry::Uninitialized,
            gate: ActionGate::new(),
            rules: Rules::default(),
            history: StateHistory::new(),
            record_history: true,
        }
    }

    /// Turn transition history recording on or off.
    pub fn set_record_history(&mut self, enabled: bool) {
        self.record_history = enabled;
    }

    pub fn records_history(&self) -> bool {
        self.record_history
    }

    /// Set the state sequence. Callable successfully at most once.
    ///
    /// The whole sequence is validated before anything is committed: on error
    /// the machine stays uninitialized. On success the current state is the
    /// first entry. No entry callback fires.
    pub fn initialize<I>(&mut self, states: I) -> Result<(), FsmError>
    where
        I: IntoIterator<Item = StateId>,
    {
        let states: Vec<StateId> = states.into_iter().collect();
        let count = states.len();
        let first = self.registry.initialize(states)?;
        debug!(initial = %first, states = count, "state machine initialized");
        Ok(())
    }

    /// Current state, or [`StateId::UNSET`] before initialization.
    pub fn current_state(&self) -> StateId {
        self.registry.current()
    }

    pub fn is_initialized(&self) -> bool {
        self.registry.is_initialized()
    }

    /// The registered sequence, once initialized.
    pub fn states(&self) -> Option<&StateSequence> {
        self.registry.sequence()
    }

    /// The state `advance` would move to.
    pub fn next_state(&self) -> Option<StateId> {
        self.registry.next()
    }

    /// Whether the machine sits on the last state of its sequence.
    pub fn is_terminal(&self) -> bool {
        self.is_initialized() && self.next_state().is_none()
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn gate(&self) -> &ActionGate {
        &self.gate
    }

    /// Move to the next state in sequence order and fire its entry callback.
    ///
    /// Fails with [`FsmError::NoNextState`] when uninitialized or already on
    /// the last state. A callback error is returned after the move has been
    /// committed.
    pub fn advance(&mut self) -> Result<(), FsmError> {
        let from = self.registry.current();
        let to = self.registry.advance()?;
        self.enter(from, to, TransitionKind::Advance)
    }

    /// Evaluate the conditional rule of the current state, if any.
    ///
    /// Returns `Ok(true)` when the rule's condition held and the machine
    /// jumped to the rule's target (firing the target's entry callback), and
    /// `Ok(false)` when there is no rule or the condition is false. Rules of
    /// other states are never consulted.
    ///
    /// The target is only checked once the condition holds: a rule pointing
    /// outside the sequence or backwards stays inert while its condition is
    /// false, and fails with [`FsmError::UnknownState`] or
    /// [`FsmError::BackwardTransition`] when it would fire.
    pub fn evaluate_conditional(&mut self) -> Result<bool, FsmError> {
        let from = self.registry.current();
        let Some(rule) = self.rules.conditional(from) else {
            return Ok(false);
        };
        let target = rule.target;

        let holds = rule.condition.check().map_err(|source| {
            warn!(state = %from, error = %source, "condition evaluation failed");
            FsmError::ConditionFailed {
                state: from,
                source,
            }
        })?;
        if !holds {
            trace!(state = %from, target = %target, "condition not met");
            return Ok(false);
        }

        self.registry.jump_to(target)?;
        self.enter(from, target, TransitionKind::Conditional)?;
        Ok(true)
    }

    /// Evaluate conditional rules until none fires.
    ///
    /// Returns the number of transitions taken. Every conditional jump moves
    /// strictly forward, so this stops after at most `len - 1` transitions.
    ///
    /// # Example
    ///
    /// ```rust
    /// use waypoint::{Condition, StateId, StateMachine};
    ///
    /// const A: StateId = StateId::from_name("A");
    /// const B: StateId = StateId::from_name("B");
    /// const C: StateId = StateId::from_name("C");
    ///
    /// let mut machine = StateMachine::new();
    /// machine.initialize([A, B, C]).unwrap();
    /// machine.set_conditional(A, B, Condition::always()).unwrap();
    /// machine.set_conditional(B, C, Condition::always()).unwrap();
    ///
    /// assert_eq!(machine.settle(), Ok(2));
    /// assert_eq!(machine.current_state(), C);
    /// ```
    pub fn settle(&mut self) -> Result<usize, FsmError> {
        let mut taken = 0;
        while self.evaluate_conditional()? {
            taken += 1;
        }
        Ok(taken)
    }

    /// Register the conditional rule for `state`, replacing any previous one.
    ///
    /// `target` is validated against the sequence here when the machine is
    /// already initialized, and again at evaluation time.
    pub fn set_conditional(
        &mut self,
        state: StateId,
        target: StateId,
        condition: Condition,
    ) -> Result<(), FsmError> {
        if state.is_unset() || target.is_unset() {
            return Err(FsmError::ReservedStateId);
        }
        if let Some(sequence) = self.registry.sequence() {
            let to = sequence
                .position(target)
                .ok_or(FsmError::UnknownState { state: target })?;
            if let Some(from) = sequence.position(state) {
                if to <= from {
                    return Err(FsmError::BackwardTransition {
                        from: state,
                        to: target,
                    });
                }
            }
        }

        self.rules
            .set_conditional(state, ConditionalRule { target, condition });
        Ok(())
    }

    /// Permit `action` while the machine is in `state`. Idempotent.
    ///
    /// `state` is not constrained; a permission for a state outside the
    /// sequence never matches.
    pub fn allow(&mut self, state: StateId, action: impl Into<ActionId>) -> Result<(), FsmError> {
        let action = action.into();
        if self.gate.allow(state, action.clone()) {
            trace!(state = %state, action = %action, "action allowed");
        }
        Ok(())
    }

    pub fn is_allowed(&self, state: StateId, action: impl Into<ActionId>) -> bool {
        self.gate.is_allowed(state, &action.into())
    }

    /// Gate check to run first thing in every guarded action.
    ///
    /// Every action is rejected before initialization.
    pub fn check_and_enter(&self, action: impl Into<ActionId>) -> Result<(), FsmError> {
        let action = action.into();
        let state = self.registry.current();
        if self.is_initialized() && self.gate.is_allowed(state, &action) {
            trace!(state = %state, action = %action, "action permitted");
            return Ok(());
        }

        warn!(state = %state, action = %action, "action rejected");
        Err(FsmError::ActionNotAllowed { state, action })
    }

    /// Run `body` only if `action` passes the gate.
    pub fn gated<T, F>(&self, action: impl Into<ActionId>, body: F) -> Result<T, FsmError>
    where
        F: FnOnce() -> T,
    {
        self.check_and_enter(action)?;
        Ok(body())
    }

    /// Register the entry callback for `state`, replacing any previous one.
    pub fn set_callback(&mut self, state: StateId, callback: EntryCallback) -> Result<(), FsmError> {
        self.rules.set_callback(state, callback);
        Ok(())
    }

    /// Bookkeeping after the cursor has moved: history, log, entry callback.
    fn enter(&mut self, from: StateId, to: StateId, kind: TransitionKind) -> Result<(), FsmError> {
        if self.record_history {
            self.history = self.history.record(StateTransition::now(from, to, kind));
        }
        debug!(from = %from, to = %to, kind = ?kind, "state transition");

        if let Some(callback) = self.rules.callback(to) {
            callback.invoke().map_err(|source| {
                warn!(state = %to, error = %source, "entry callback failed");
                FsmError::CallbackFailed { state: to, source }
            })?;
        }
        Ok(())
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HookError;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    const S0: StateId = StateId::from_name("STATE0");
    const S1: StateId = StateId::from_name("STATE1");
    const S2: StateId = StateId::from_name("STATE2");
    const S3: StateId = StateId::from_name("STATE3");

    fn initialized() -> StateMachine {
        let mut machine = StateMachine::new();
        machine.initialize([S0, S1, S2, S3]).unwrap();
        machine
    }

    fn counter() -> (Arc<AtomicUsize>, EntryCallback) {
        let calls = Arc::new(AtomicUsize::new(0));
        let count = Arc::clone(&calls);
        let callback = EntryCallback::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
        });
        (calls, callback)
    }

    #[test]
    fn new_machine_is_unset() {
        let machine = StateMachine::new();
        assert!(!machine.is_initialized());
        assert!(!machine.is_terminal());
        assert_eq!(machine.current_state(), StateId::UNSET);
        assert!(machine.states().is_none());
    }

    #[test]
    fn initialize_sets_first_state() {
        let machine = initialized();
        assert_eq!(machine.current_state(), S0);
        assert_eq!(machine.next_state(), Some(S1));
        assert_eq!(machine.states().map(StateSequence::len), Some(4));
    }

    #[test]
    fn second_initialize_fails_regardless_of_input() {
        let mut machine = initialized();
        let other = StateId::from_name("invalid");

        assert_eq!(machine.initialize([other]), Err(FsmError::AlreadyInitialized));
        assert_eq!(machine.initialize([]), Err(FsmError::AlreadyInitialized));
        assert_eq!(machine.current_state(), S0);
    }

    #[test]
    fn failed_initialize_can_be_retried() {
        let mut machine = StateMachine::new();
        assert_eq!(
            machine.initialize([S1, S2, StateId::UNSET, S3]),
            Err(FsmError::ZeroStateId { position: 2 })
        );
        assert_eq!(machine.current_state(), StateId::UNSET);

        assert!(machine.initialize([S1, S2]).is_ok());
        assert_eq!(machine.current_state(), S1);
    }

    #[test]
    fn advance_walks_the_sequence() {
        let mut machine = initialized();

        for expected in [S1, S2, S3] {
            machine.advance().unwrap();
            assert_eq!(machine.current_state(), expected);
        }
        assert!(machine.is_terminal());
        assert_eq!(machine.advance(), Err(FsmError::NoNextState { current: S3 }));
        assert_eq!(machine.current_state(), S3);
    }

    #[test]
    fn advance_fails_when_uninitialized() {
        let mut machine = StateMachine::new();
        assert!(matches!(
            machine.advance(),
            Err(FsmError::NoNextState { .. })
        ));
    }

    #[test]
    fn gate_only_permits_in_allowed_state() {
        let mut machine = initialized();
        machine.allow(S0, "dummy").unwrap();

        assert!(machine.check_and_enter("dummy").is_ok());
        assert!(machine.is_allowed(S0, "dummy"));

        machine.advance().unwrap();
        assert_eq!(
            machine.check_and_enter("dummy"),
            Err(FsmError::ActionNotAllowed {
                state: S1,
                action: "dummy".into()
            })
        );
    }

    #[test]
    fn unallowed_action_is_rejected() {
        let machine = initialized();
        assert!(matches!(
            machine.check_and_enter("dummy"),
            Err(FsmError::ActionNotAllowed { .. })
        ));
    }

    #[test]
    fn gate_rejects_everything_before_initialization() {
        let mut machine = StateMachine::new();
        machine.allow(S0, "dummy").unwrap();

        assert!(matches!(
            machine.check_and_enter("dummy"),
            Err(FsmError::ActionNotAllowed { state, .. }) if state.is_unset()
        ));
    }

    #[test]
    fn allow_accepts_any_state() {
        let mut machine = initialized();
        let elsewhere = StateId::from_name("ELSEWHERE");

        assert!(machine.allow(elsewhere, "dummy").is_ok());
        assert!(machine.allow(elsewhere, "dummy").is_ok());
        assert!(machine.check_and_enter("dummy").is_err());
        assert_eq!(machine.allow(StateId::UNSET, "dummy"), Ok(()));
        assert!(machine.is_allowed(StateId::UNSET, "dummy"));
    }

    #[test]
    fn zero_state_permission_does_not_open_uninitialized_gate() {
        let mut machine = StateMachine::new();
        assert_eq!(machine.allow(StateId::UNSET, "dummy"), Ok(()));
        let (calls, callback) = counter();
        assert_eq!(machine.set_callback(StateId::UNSET, callback), Ok(()));

        assert!(matches!(
            machine.check_and_enter("dummy"),
            Err(FsmError::ActionNotAllowed { state, .. }) if state.is_unset()
        ));

        machine.initialize([S0, S1]).unwrap();
        machine.advance().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn gated_body_runs_only_when_permitted() {
        let mut machine = initialized();
        machine.allow(S0, "count").unwrap();
        let ran = AtomicBool::new(false);

        assert_eq!(machine.gated("count", || 7), Ok(7));
        machine.advance().unwrap();
        let result = machine.gated("count", || ran.store(true, Ordering::SeqCst));

        assert!(result.is_err());
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[test]
    fn callback_fires_on_advance_not_initialize() {
        let mut machine = StateMachine::new();
        let (calls, callback) = counter();
        machine.set_callback(S0, callback.clone()).unwrap();
        machine.set_callback(S1, callback).unwrap();

        machine.initialize([S0, S1, S2]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        machine.advance().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        machine.advance().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_failure_keeps_transition() {
        let mut machine = initialized();
        machine
            .set_callback(S1, EntryCallback::fallible(|| Err(HookError::new("boom"))))
            .unwrap();

        assert_eq!(
            machine.advance(),
            Err(FsmError::CallbackFailed {
                state: S1,
                source: HookError::new("boom")
            })
        );
        assert_eq!(machine.current_state(), S1);
        assert_eq!(machine.history().transitions().len(), 1);
    }

    #[test]
    fn callback_failure_keeps_conditional_transition() {
        let mut machine = initialized();
        machine
            .set_callback(S2, EntryCallback::fallible(|| Err(HookError::new("boom"))))
            .unwrap();
        machine.set_conditional(S0, S2, Condition::always()).unwrap();

        assert_eq!(
            machine.evaluate_conditional(),
            Err(FsmError::CallbackFailed {
                state: S2,
                source: HookError::new("boom")
            })
        );
        assert_eq!(machine.current_state(), S2);
        assert_eq!(machine.history().count(TransitionKind::Conditional), 1);
        assert_eq!(machine.history().get_path(), vec![S0, S2]);
    }

    #[test]
    fn conditional_without_rule_is_noop() {
        let mut machine = initialized();
        for _ in 0..3 {
            assert_eq!(machine.evaluate_conditional(), Ok(false));
            assert_eq!(machine.current_state(), S0);
        }
    }

    #[test]
    fn conditional_only_checks_current_state() {
        let mut machine = initialized();
        let flag = Arc::new(AtomicBool::new(true));
        let reader = Arc::clone(&flag);
        machine
            .set_conditional(S1, S3, Condition::new(move || reader.load(Ordering::SeqCst)))
            .unwrap();

        assert_eq!(machine.evaluate_conditional(), Ok(false));
        assert_eq!(machine.current_state(), S0);

        machine.advance().unwrap();
        assert_eq!(machine.evaluate_conditional(), Ok(true));
        assert_eq!(machine.current_state(), S3);
        assert_eq!(machine.history().count(TransitionKind::Conditional), 1);
    }

    #[test]
    fn conditional_fires_target_callback_once() {
        let mut machine = initialized();
        let (calls, callback) = counter();
        let open = Arc::new(AtomicBool::new(false));
        let reader = Arc::clone(&open);
        machine.set_callback(S2, callback).unwrap();
        machine
            .set_conditional(S1, S2, Condition::new(move || reader.load(Ordering::SeqCst)))
            .unwrap();
        machine.advance().unwrap();

        assert_eq!(machine.evaluate_conditional(), Ok(false));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        open.store(true, Ordering::SeqCst);
        assert_eq!(machine.evaluate_conditional(), Ok(true));
        assert_eq!(machine.current_state(), S2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(machine.evaluate_conditional(), Ok(false));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failing_condition_leaves_state() {
        let mut machine = initialized();
        machine
            .set_conditional(S0, S1, Condition::fallible(|| Err("no oracle".into())))
            .unwrap();

        assert!(matches!(
            machine.evaluate_conditional(),
            Err(FsmError::ConditionFailed { state, .. }) if state == S0
        ));
        assert_eq!(machine.current_state(), S0);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn set_conditional_validates_target_once_initialized() {
        let mut machine = initialized();
        let unknown = StateId::from_name("NOWHERE");

        assert_eq!(
            machine.set_conditional(S0, unknown, Condition::always()),
            Err(FsmError::UnknownState { state: unknown })
        );
        assert_eq!(
            machine.set_conditional(S2, S1, Condition::always()),
            Err(FsmError::BackwardTransition { from: S2, to: S1 })
        );
        assert_eq!(
            machine.set_conditional(StateId::UNSET, S1, Condition::always()),
            Err(FsmError::ReservedStateId)
        );
    }

    #[test]
    fn rule_registered_before_initialize_is_checked_on_evaluation() {
        let mut machine = StateMachine::new();
        let unknown = StateId::from_name("NOWHERE");
        machine
            .set_conditional(S0, unknown, Condition::always())
            .unwrap();
        machine.initialize([S0, S1]).unwrap();

        assert_eq!(
            machine.evaluate_conditional(),
            Err(FsmError::UnknownState { state: unknown })
        );
        assert_eq!(machine.current_state(), S0);
    }

    #[test]
    fn broken_rule_is_inert_while_condition_is_false() {
        let mut machine = StateMachine::new();
        let unknown = StateId::from_name("NOWHERE");
        let open = Arc::new(AtomicBool::new(false));
        let reader = Arc::clone(&open);
        machine
            .set_conditional(S2, S1, Condition::new(move || reader.load(Ordering::SeqCst)))
            .unwrap();
        machine
            .set_conditional(S0, unknown, Condition::new(|| false))
            .unwrap();
        machine.initialize([S0, S1, S2]).unwrap();

        assert_eq!(machine.evaluate_conditional(), Ok(false));
        assert_eq!(machine.settle(), Ok(0));

        machine.advance().unwrap();
        machine.advance().unwrap();
        assert_eq!(machine.evaluate_conditional(), Ok(false));
        assert_eq!(machine.settle(), Ok(0));

        open.store(true, Ordering::SeqCst);
        assert_eq!(
            machine.evaluate_conditional(),
            Err(FsmError::BackwardTransition { from: S2, to: S1 })
        );
        assert_eq!(machine.current_state(), S2);
    }

    #[test]
    fn settle_follows_rules_to_fixpoint() {
        let mut machine = initialized();
        machine.set_conditional(S0, S1, Condition::always()).unwrap();
        machine.set_conditional(S1, S3, Condition::always()).unwrap();

        assert_eq!(machine.settle(), Ok(2));
        assert_eq!(machine.current_state(), S3);
        assert_eq!(machine.history().get_path(), vec![S0, S1, S3]);
        assert_eq!(machine.settle(), Ok(0));
    }

    #[test]
    fn history_can_be_disabled() {
        let mut machine = initialized();
        machine.set_record_history(false);
        machine.advance().unwrap();

        assert!(machine.history().is_empty());
    }
}
