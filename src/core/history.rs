//! Transition history.
//!
//! Every completed transition is recorded so the path a machine took through
//! its state sequence can be audited after the fact.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a transition was triggered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Forced one-step move to the next state in sequence order.
    Advance,
    /// Predicate-driven jump to the target of the current state's rule.
    Conditional,
}

/// Record of a single completed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: StateId,
    pub to: StateId,
    pub kind: TransitionKind,
    pub timestamp: DateTime<Utc>,
}

impl StateTransition {
    /// A transition stamped with the current time.
    pub fn now(from: StateId, to: StateId, kind: TransitionKind) -> Self {
        Self {
            from,
            to,
            kind,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered history of transitions.
///
/// `record` returns a new history and leaves the original untouched.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{StateHistory, StateId, StateTransition, TransitionKind};
///
/// const OPEN: StateId = StateId::from_name("OPEN");
/// const CLOSED: StateId = StateId::from_name("CLOSED");
///
/// let history = StateHistory::new();
/// let history = history.record(StateTransition::now(OPEN, CLOSED, TransitionKind::Advance));
///
/// assert_eq!(history.get_path(), vec![OPEN, CLOSED]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<StateTransition>,
}

impl StateHistory {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: StateTransition) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// States traversed: the first `from`, then every `to` in order.
    pub fn get_path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Time between the first and the last recorded transition.
    pub fn duration(&self) -> Option<Duration> {
        let first = self.transitions.first()?;
        let last = self.transitions.last()?;
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Number of transitions triggered the given way.
    pub fn count(&self, kind: TransitionKind) -> usize {
        self.transitions.iter().filter(|t| t.kind == kind).count()
    }

    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
