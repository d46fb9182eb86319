use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub node: NodeConfig,
    pub pubsub: PubsubConfig,
    /// Project that incoming notifications are attributed to.
    /// `_` is the provider's wildcard project.
    pub project_id: String,
    /// Enables dangerous operations like purge. Must never be true in production.
    pub test_mode: bool,
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_address: String,
    pub data_dir: String,
}

#[derive(Debug, Clone)]
pub struct PubsubConfig {
    /// How long a push delivery may take before it is abandoned
    pub ack_deadline: Duration,
    /// Maximum push request body size in bytes
    pub max_message_size: u64,
}

impl Default for PubsubConfig {
    fn default() -> Self {
        Self {
            ack_deadline: Duration::from_secs(10),
            max_message_size: 16 * 1024 * 1024, // 16 MiB, base64 encoded
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = PubsubConfig::default();

        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());

        let project_id = std::env::var("PROJECT_ID").unwrap_or_else(|_| "_".to_string());

        let ack_deadline =
            parse_integer("ACK_DEADLINE_MS", std::env::var("ACK_DEADLINE_MS").ok())?
                .map(Duration::from_millis)
                .unwrap_or(defaults.ack_deadline);

        let max_message_size =
            parse_integer("MAX_MESSAGE_SIZE", std::env::var("MAX_MESSAGE_SIZE").ok())?
                .unwrap_or(defaults.max_message_size);

        let test_mode = std::env::var("TEST_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let config = Config {
            node: NodeConfig {
                bind_address,
                data_dir,
            },
            pubsub: PubsubConfig {
                ack_deadline,
                max_message_size,
            },
            project_id,
            test_mode,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.project_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "PROJECT_ID cannot be empty".to_string(),
            ));
        }

        if self.project_id.contains('/') {
            return Err(ConfigError::ValidationError(
                "PROJECT_ID cannot contain '/'".to_string(),
            ));
        }

        if self.pubsub.ack_deadline.is_zero() {
            return Err(ConfigError::ValidationError(
                "ACK_DEADLINE_MS must be greater than 0".to_string(),
            ));
        }

        if self.pubsub.ack_deadline > Duration::from_secs(600) {
            tracing::warn!(
                "Ack deadline of {:?} exceeds the 600s maximum a push subscription allows; \
                 deliveries will be redelivered before handlers time out.",
                self.pubsub.ack_deadline
            );
        }

        Ok(())
    }
}

/// Parse an optional integer variable. Unset is `None`; anything unparseable
/// is an error rather than a silent fallback.
fn parse_integer(key: &str, raw: Option<String>) -> Result<Option<u64>, ConfigError> {
    raw.map(|v| {
        v.trim().parse().map_err(|_| {
            ConfigError::ValidationError(format!("{key} must be an integer, got {v:?}"))
        })
    })
    .transpose()
}
