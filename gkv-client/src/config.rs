//! # Client Configuration
//!
//! Purpose: Settings that change how the client core dispatches and decodes.
//! Connection settings (addresses, TLS, credentials, retries) belong to the
//! driver and are not modelled here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::batch::MIN_BATCH_CAPACITY;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid client config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for `KvClient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Cluster deployments forbid database-wide commands inside batches and
    /// accept explicit routes.
    pub cluster_mode: bool,
    /// Decode `OK` status replies as the string `"OK"` instead of `true`.
    pub reply_literal: bool,
    /// Initial batch buffer capacity; raised to 16 when smaller.
    pub batch_capacity: usize,
    /// Logical database the connection was opened on.
    pub database_id: Option<i64>,
    /// Name attached to log events.
    pub client_name: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            cluster_mode: false,
            reply_literal: false,
            batch_capacity: MIN_BATCH_CAPACITY,
            database_id: None,
            client_name: None,
        }
    }
}

impl ClientConfig {
    /// Parses a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Batch buffer capacity after applying the lower bound.
    pub fn effective_batch_capacity(&self) -> usize {
        self.batch_capacity.max(MIN_BATCH_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_standalone() {
        let config = ClientConfig::default();
        assert!(!config.cluster_mode);
        assert!(!config.reply_literal);
        assert_eq!(config.batch_capacity, 16);
        assert_eq!(config.database_id, None);
    }

    #[test]
    fn parses_partial_json() {
        let config = ClientConfig::from_json(r#"{"cluster_mode": true, "client_name": "worker-1"}"#)
            .unwrap();
        assert!(config.cluster_mode);
        assert_eq!(config.client_name.as_deref(), Some("worker-1"));
        assert_eq!(config.batch_capacity, 16);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            ClientConfig::from_json("{\"cluster_mode\": 3}"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn clamps_small_batch_capacity() {
        let config = ClientConfig {
            batch_capacity: 2,
            ..ClientConfig::default()
        };
        assert_eq!(config.effective_batch_capacity(), 16);

        let config = ClientConfig {
            batch_capacity: 64,
            ..ClientConfig::default()
        };
        assert_eq!(config.effective_batch_capacity(), 64);
    }
}
