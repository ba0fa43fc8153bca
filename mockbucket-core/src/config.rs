//! Bucket configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{BucketError, BucketResult};

/// Settings for an in-memory bucket.
///
/// Every field has a default, so a partial JSON object is a valid configuration:
///
/// ```ignore
/// use mockbucket_core::config::BucketConfig;
///
/// let config = BucketConfig::from_json(r#"{ "name": "travel-sample" }"#).unwrap();
/// assert_eq!(config.capacity, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketConfig {
    /// Name reported in logs and errors.
    pub name: String,
    /// Initial capacity hint for the slot map.
    pub capacity: usize,
    /// Expiration in seconds applied when a mutation does not specify one; 0 disables it.
    pub default_expiration_secs: u32,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            capacity: 0,
            default_expiration_secs: 0,
        }
    }
}

impl BucketConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`BucketError::Configuration`] if the input is not a valid configuration.
    pub fn from_json(input: &str) -> BucketResult<Self> {
        let config: BucketConfig = serde_json::from_str(input)
            .map_err(|e| BucketError::Configuration(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> BucketResult<()> {
        if self.name.is_empty() {
            return Err(BucketError::Configuration("bucket name must not be empty".into()));
        }

        Ok(())
    }

    /// The default expiration as a duration, if one is configured.
    pub fn default_expiration(&self) -> Option<Duration> {
        match self.default_expiration_secs {
            0 => None,
            secs => Some(Duration::seconds(i64::from(secs))),
        }
    }
}
