//! Fixed-width state identifiers.
//!
//! A [`StateId`] is an opaque 32-byte value. The all-zero value is reserved
//! as the "unset" sentinel: it is what an uninitialized machine reports as
//! its current state, and it can never be part of a valid state sequence.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of a state identifier in bytes.
pub const STATE_ID_LEN: usize = 32;

/// Opaque identifier for one machine state.
///
/// Identifiers are usually built from a short ASCII name, right-padded with
/// zero bytes, so they read well in logs while still comparing as raw bytes.
///
/// # Example
///
/// ```rust
/// use waypoint::core::StateId;
///
/// const FUNDING: StateId = StateId::from_name("FUNDING");
///
/// assert!(!FUNDING.is_unset());
/// assert!(StateId::UNSET.is_unset());
/// assert_eq!(FUNDING.to_string(), "FUNDING");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId([u8; STATE_ID_LEN]);

impl StateId {
    /// The reserved sentinel meaning "no state".
    pub const UNSET: StateId = StateId([0; STATE_ID_LEN]);

    /// Build an identifier from its raw bytes.
    pub const fn from_bytes(bytes: [u8; STATE_ID_LEN]) -> Self {
        StateId(bytes)
    }

    /// Build an identifier from an ASCII name, right-padded with zeros.
    ///
    /// An empty name yields [`StateId::UNSET`].
    ///
    /// # Panics
    ///
    /// Panics if `name` is longer than [`STATE_ID_LEN`] bytes. In a `const`
    /// context this is a compile error.
    pub const fn from_name(name: &str) -> Self {
        let src = name.as_bytes();
        assert!(
            src.len() <= STATE_ID_LEN,
            "state name longer than 32 bytes"
        );

        let mut bytes = [0u8; STATE_ID_LEN];
        let mut i = 0;
        while i < src.len() {
            bytes[i] = src[i];
            i += 1;
        }
        StateId(bytes)
    }

    /// Raw bytes of the identifier.
    pub const fn as_bytes(&self) -> &[u8; STATE_ID_LEN] {
        &self.0
    }

    /// Whether this is the reserved sentinel.
    pub fn is_unset(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// The printable name, if the identifier is ASCII text padded with zeros.
    pub fn name(&self) -> Option<&str> {
        let end = self
            .0
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(STATE_ID_LEN);
        let (text, padding) = self.0.split_at(end);

        if text.is_empty() || padding.iter().any(|b| *b != 0) {
            return None;
        }
        if !text.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            return None;
        }
        std::str::from_utf8(text).ok()
    }
}

impl From<[u8; STATE_ID_LEN]> for StateId {
    fn from(bytes: [u8; STATE_ID_LEN]) -> Self {
        StateId(bytes)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            return f.write_str("<unset>");
        }
        match self.name() {
            Some(name) => f.write_str(name),
            None => {
                f.write_str("0x")?;
                for byte in &self.0 {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateId({self})")
    }
}

impl Default for StateId {
    fn default() -> Self {
        StateId::UNSET
    }
}
