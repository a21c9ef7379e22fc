//! Waypoint: a guarded linear state machine
//!
//! Waypoint is meant to be embedded in a larger stateful component (a sale,
//! an auction, an escrow) to decide which of its actions may run right now.
//! The component declares an ordered sequence of states once; from then on
//! the machine only moves forward through it, and every guarded action checks
//! the machine's gate before doing anything else.
//!
//! # Core Concepts
//!
//! - **Registry**: the ordered, validated state sequence, set exactly once
//! - **Advance**: forced one-step move to the next state
//! - **Conditional transitions**: predicate-driven jumps, evaluated on demand
//! - **Action gate**: `(state, action)` permissions checked on entry
//! - **Entry callbacks**: hooks fired once per transition into a state
//! - **History and checkpoints**: an audit trail and serializable snapshots
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//! use waypoint::{state_ids, MachineBuilder};
//!
//! state_ids! {
//!     SETUP,
//!     FUNDING,
//!     CLOSED,
//! }
//!
//! let deadline_passed = Arc::new(AtomicBool::new(false));
//! let deadline = Arc::clone(&deadline_passed);
//!
//! let mut sale = MachineBuilder::new()
//!     .states([SETUP, FUNDING, CLOSED])
//!     .allow(FUNDING, "contribute")
//!     .allow(CLOSED, "refund")
//!     .when(FUNDING, CLOSED, move || deadline.load(Ordering::SeqCst))
//!     .build()
//!     .unwrap();
//!
//! sale.advance().unwrap();
//! assert!(sale.check_and_enter("contribute").is_ok());
//!
//! deadline_passed.store(true, Ordering::SeqCst);
//! assert_eq!(sale.evaluate_conditional(), Ok(true));
//! assert!(sale.check_and_enter("contribute").is_err());
//! assert!(sale.check_and_enter("refund").is_ok());
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use crate::core::{ActionId, Condition, EntryCallback, HookError, StateId, TransitionKind};
pub use machine::{FsmError, SharedMachine, StateMachine};
