//! Compare-and-swap tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A version stamp attached to every stored document.
///
/// A freshly created document starts at [`Cas::SEED`] and every successful mutation
/// moves it forward by exactly one. When passed as the *expected* CAS of a mutation,
/// [`Cas::NONE`] means "do not check"; since the seed is 100 a live document can never
/// carry the sentinel value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cas(u64);

impl Cas {
    /// Expected-CAS sentinel that skips the optimistic concurrency check.
    pub const NONE: Cas = Cas(0);

    /// Version assigned to a key when it is created.
    pub const SEED: Cas = Cas(100);

    /// Wraps a raw CAS value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Whether this is the "skip check" sentinel.
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// The version that follows this one.
    ///
    /// Saturates at `u64::MAX` so a version never wraps onto [`Cas::NONE`].
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Whether a mutation expecting `self` may proceed against a document at `current`.
    pub fn permits(self, current: Cas) -> bool {
        self.is_none() || self == current
    }
}

impl From<u64> for Cas {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Cas> for u64 {
    fn from(cas: Cas) -> Self {
        cas.0
    }
}

impl fmt::Display for Cas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
