//! Predicates that drive conditional transitions.
//!
//! A condition is an opaque zero-argument callable. The machine does not know
//! what it reads; the host typically closes over its own state (a deadline, a
//! balance, a flag) and the machine only asks "true or false?" when the host
//! calls for conditional evaluation.

use super::error::HookError;
use std::fmt;
use std::sync::Arc;

type Predicate = dyn Fn() -> Result<bool, HookError> + Send + Sync;

/// Predicate consulted by a conditional transition rule.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use waypoint::core::Condition;
///
/// let closed = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&closed);
/// let sale_closed = Condition::new(move || flag.load(Ordering::SeqCst));
///
/// assert_eq!(sale_closed.check(), Ok(false));
/// closed.store(true, Ordering::SeqCst);
/// assert_eq!(sale_closed.check(), Ok(true));
/// ```
#[derive(Clone)]
pub struct Condition {
    predicate: Arc<Predicate>,
}

impl Condition {
    /// Create a condition from an infallible predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(move || -> Result<bool, HookError> { Ok(predicate()) }),
        }
    }

    /// Create a condition whose evaluation may fail.
    ///
    /// An error aborts the conditional transition and is reported to the
    /// caller; the current state does not change.
    pub fn fallible<F>(predicate: F) -> Self
    where
        F: Fn() -> Result<bool, HookError> + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// A condition that always holds.
    pub fn always() -> Self {
        Self::new(|| true)
    }

    /// Evaluate the predicate.
    pub fn check(&self) -> Result<bool, HookError> {
        (self.predicate)()
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}
