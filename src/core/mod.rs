//! Core value types of the state machine.
//!
//! This module holds the plain data the machine is built from:
//! - `StateId` and `ActionId` identifiers
//! - `Condition` predicates and `EntryCallback` hooks supplied by the host
//! - the audited `StateHistory` of completed transitions
//!
//! Nothing here knows about the machine's tables or its current state.

mod action;
mod callback;
mod error;
mod guard;
mod history;
mod state;

pub use action::ActionId;
pub use callback::EntryCallback;
pub use error::HookError;
pub use guard::Condition;
pub use history::{StateHistory, StateTransition, TransitionKind};
pub use state::{StateId, STATE_ID_LEN};
