//! Biometric ingestion configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Biometric ingestion configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// WebSocket heartbeat interval in seconds
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,

    /// Bounded capacity of each downstream subscriber channel
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl IngestConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }

    /// Validate ingestion configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.heartbeat_secs == 0 {
            return Err(ValidationError::InvalidHeartbeat);
        }
        if self.channel_capacity == 0 {
            return Err(ValidationError::InvalidChannelCapacity);
        }
        Ok(())
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            heartbeat_secs: default_heartbeat_secs(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_heartbeat_secs() -> u64 {
    30
}

fn default_channel_capacity() -> usize {
    256
}
