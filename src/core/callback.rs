//! Entry callbacks fired when a state becomes current.

use super::error::HookError;
use std::fmt;
use std::sync::Arc;

type Hook = dyn Fn() -> Result<(), HookError> + Send + Sync;

/// Side-effecting hook registered against a state.
///
/// The machine invokes it exactly once per transition into that state, after
/// the current state has already been updated. Initialization never fires it.
#[derive(Clone)]
pub struct EntryCallback {
    hook: Arc<Hook>,
}

impl EntryCallback {
    /// Create a callback that cannot fail.
    pub fn new<F>(hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            hook: Arc::new(move || -> Result<(), HookError> {
                hook();
                Ok(())
            }),
        }
    }

    /// Create a callback that may fail.
    ///
    /// A failure is reported by the transition call, but the transition itself
    /// has already been committed and is not rolled back.
    pub fn fallible<F>(hook: F) -> Self
    where
        F: Fn() -> Result<(), HookError> + Send + Sync + 'static,
    {
        Self {
            hook: Arc::new(hook),
        }
    }

    pub fn invoke(&self) -> Result<(), HookError> {
        (self.hook)()
    }
}

impl fmt::Debug for EntryCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EntryCallback(..)")
    }
}
