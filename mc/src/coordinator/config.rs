//! Coordinator configuration

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Capacity of each agent's inbox
    #[serde(rename = "inbox-buffer", default = "default_inbox_buffer")]
    pub inbox_buffer: usize,

    /// Max event payload size in bytes (1MB default)
    #[serde(rename = "max-payload-size", default = "default_max_payload_size")]
    pub max_payload_size: usize,

    /// Number of recent activity entries kept for status reports
    #[serde(rename = "activity-capacity", default = "default_activity_capacity")]
    pub activity_capacity: usize,

    /// Channel buffer size for service requests
    #[serde(rename = "channel-buffer", default = "default_channel_buffer")]
    pub channel_buffer: usize,
}

fn default_inbox_buffer() -> usize {
    debug!("default_inbox_buffer: called");
    100
}

fn default_max_payload_size() -> usize {
    debug!("default_max_payload_size: called");
    1024 * 1024 // 1MB
}

fn default_activity_capacity() -> usize {
    debug!("default_activity_capacity: called");
    100
}

fn default_channel_buffer() -> usize {
    debug!("default_channel_buffer: called");
    1000
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        debug!("CoordinatorConfig::default: called");
        Self {
            inbox_buffer: default_inbox_buffer(),
            max_payload_size: default_max_payload_size(),
            activity_capacity: default_activity_capacity(),
            channel_buffer: default_channel_buffer(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.inbox_buffer, 100);
        assert_eq!(config.max_payload_size, 1024 * 1024);
        assert_eq!(config.activity_capacity, 100);
        assert_eq!(config.channel_buffer, 1000);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: CoordinatorConfig = serde_yaml::from_str("inbox-buffer: 4\n").unwrap();
        assert_eq!(config.inbox_buffer, 4);
        assert_eq!(config.max_payload_size, 1024 * 1024);
        assert_eq!(config.activity_capacity, 100);
    }
}
