//! Results returned by the primitive operations.

use serde::Serialize;

use crate::{
    cas::Cas,
    document::Content,
    status::{Durability, ResponseStatus},
};

/// Outcome of a single-key operation.
///
/// Reads carry the document content in `value`; mutations leave it empty. Failed
/// operations report [`Cas::NONE`] and [`Durability::Unspecified`].
#[derive(Debug, Clone, Serialize)]
pub struct OperationResult<T = Content> {
    pub id: String,
    pub status: ResponseStatus,
    pub cas: Cas,
    pub durability: Durability,
    #[serde(skip)]
    pub value: Option<T>,
}

impl<T> OperationResult<T> {
    /// A successful read.
    pub fn found(id: impl Into<String>, cas: Cas, value: T) -> Self {
        Self {
            id: id.into(),
            status: ResponseStatus::Success,
            cas,
            durability: Durability::Unspecified,
            value: Some(value),
        }
    }

    /// A successful mutation.
    pub fn mutated(id: impl Into<String>, cas: Cas, durability: Durability) -> Self {
        Self {
            id: id.into(),
            status: ResponseStatus::Success,
            cas,
            durability,
            value: None,
        }
    }

    /// A failed operation.
    pub fn failed(id: impl Into<String>, status: ResponseStatus) -> Self {
        Self {
            id: id.into(),
            status,
            cas: Cas::NONE,
            durability: Durability::Unspecified,
            value: None,
        }
    }

    /// Whether the operation succeeded.
    pub fn success(&self) -> bool {
        self.status.is_success()
    }

    /// Converts the payload, keeping every other field.
    pub fn map_value<U>(self, f: impl FnOnce(T) -> U) -> OperationResult<U> {
        OperationResult {
            id: self.id,
            status: self.status,
            cas: self.cas,
            durability: self.durability,
            value: self.value.map(f),
        }
    }

    /// Like [`map_value`](Self::map_value) for conversions that can fail.
    pub fn try_map_value<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<OperationResult<U>, E> {
        Ok(OperationResult {
            id: self.id,
            status: self.status,
            cas: self.cas,
            durability: self.durability,
            value: self.value.map(f).transpose()?,
        })
    }

    /// Drops the payload.
    pub fn without_value(self) -> OperationResult<()> {
        self.map_value(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_carry_no_cas() {
        let result: OperationResult = OperationResult::failed("k", ResponseStatus::KeyNotFound);
        assert!(!result.success());
        assert_eq!(result.cas, Cas::NONE);
        assert!(result.value.is_none());
    }

    #[test]
    fn mapping_preserves_metadata() {
        let result = OperationResult::found("k", Cas::SEED, 2u8).map_value(|v| v * 2);
        assert!(result.success());
        assert_eq!(result.cas, Cas::SEED);
        assert_eq!(result.value, Some(4));

        let bad: Result<OperationResult<u8>, &str> =
            OperationResult::found("k", Cas::SEED, 2u8).try_map_value(|_| Err("nope"));
        assert_eq!(bad.unwrap_err(), "nope");
    }

    #[test]
    fn serializes_without_the_payload() {
        let result = OperationResult::<()>::mutated("k", Cas::new(101), Durability::Satisfied);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "k",
                "status": "success",
                "cas": 101,
                "durability": "satisfied",
            })
        );
    }
}
