//! Response status codes and simulated durability.
//!
//! The in-memory bucket performs no replication or persistence. Durability requirements
//! are accepted so that callers written against a clustered client keep compiling, and
//! the outcome is reported as [`Durability::Satisfied`] whenever anything was requested.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a primitive operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// The operation completed.
    Success,
    /// The key is absent or its document has expired.
    KeyNotFound,
    /// An insert targeted a key that already holds a live document.
    KeyExists,
    /// The expected CAS did not match the stored version.
    DocumentMutationDetected,
}

impl ResponseStatus {
    /// Whether this status represents a completed operation.
    pub fn is_success(self) -> bool {
        matches!(self, ResponseStatus::Success)
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseStatus::Success => "Success",
            ResponseStatus::KeyNotFound => "KeyNotFound",
            ResponseStatus::KeyExists => "KeyExists",
            ResponseStatus::DocumentMutationDetected => "DocumentMutationDetected",
        };

        f.write_str(name)
    }
}

/// Number of replicas a mutation should reach before it is acknowledged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicateTo {
    #[default]
    Zero,
    One,
    Two,
    Three,
}

/// Number of nodes a mutation should be persisted to before it is acknowledged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistTo {
    #[default]
    Zero,
    One,
    Two,
    Three,
    Four,
}

/// Replication and persistence requested for a mutation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DurabilityRequirement {
    pub replicate_to: ReplicateTo,
    pub persist_to: PersistTo,
}

impl DurabilityRequirement {
    /// No replication or persistence requested.
    pub const NONE: DurabilityRequirement = DurabilityRequirement {
        replicate_to: ReplicateTo::Zero,
        persist_to: PersistTo::Zero,
    };

    pub fn new(replicate_to: ReplicateTo, persist_to: PersistTo) -> Self {
        Self { replicate_to, persist_to }
    }

    /// Whether either a positive replication or persistence count was requested.
    pub fn is_requested(&self) -> bool {
        self.replicate_to != ReplicateTo::Zero || self.persist_to != PersistTo::Zero
    }

    /// The durability a successful mutation reports for this requirement.
    pub fn outcome(&self) -> Durability {
        if self.is_requested() {
            Durability::Satisfied
        } else {
            Durability::Unspecified
        }
    }
}

/// Durability reported on a mutation result.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Durability {
    #[default]
    Unspecified,
    Satisfied,
}
