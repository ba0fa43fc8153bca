//! Per-call options for mutations.

use chrono::Duration;

use crate::{cas::Cas, status::DurabilityRequirement};

/// Options shared by insert, replace, remove and upsert.
///
/// Not every field applies to every operation: insert ignores `cas`, and remove ignores
/// `expiration`. The `timeout` is carried for compatibility with clustered clients and is
/// never enforced, since every in-memory operation completes immediately.
///
/// # Example
///
/// ```ignore
/// use mockbucket_core::{cas::Cas, options::MutationOptions};
/// use chrono::Duration;
///
/// let options = MutationOptions::new()
///     .cas(Cas::new(101))
///     .expiration(Duration::seconds(30));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MutationOptions {
    pub cas: Cas,
    pub expiration: Option<Duration>,
    pub durability: DurabilityRequirement,
    pub timeout: Option<std::time::Duration>,
}

impl MutationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the stored document to be at this version.
    pub fn cas(mut self, cas: impl Into<Cas>) -> Self {
        self.cas = cas.into();
        self
    }

    /// Relative expiration; zero or negative means "never expires".
    pub fn expiration(mut self, expiration: Duration) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn durability(mut self, durability: DurabilityRequirement) -> Self {
        self.durability = durability;
        self
    }

    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
