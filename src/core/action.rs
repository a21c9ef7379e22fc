//! Identifiers for gated actions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of an externally invocable action.
///
/// The hosting component derives it from the action's own identity, usually
/// its name. The machine only ever compares identifiers for equality.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    pub fn new(name: impl Into<String>) -> Self {
        ActionId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActionId {
    fn from(name: &str) -> Self {
        ActionId::new(name)
    }
}

impl From<String> for ActionId {
    fn from(name: String) -> Self {
        ActionId(name)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionId({:?})", self.0)
    }
}
