//! WebSocket session configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Timers and queue sizing for upgraded connections
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketConfig {
    /// Transport ping interval for routes with autoping
    #[serde(default = "default_autoping")]
    pub autoping_secs: u64,

    /// Application keepalive interval used by the `/quux` connect hook
    #[serde(default = "default_keepalive")]
    pub keepalive_secs: u64,

    /// Per-connection outbound queue size
    #[serde(default = "default_outbound_capacity")]
    pub outbound_capacity: usize,
}

impl WebSocketConfig {
    pub fn autoping(&self) -> Duration {
        Duration::from_secs(self.autoping_secs)
    }

    pub fn keepalive(&self) -> Duration {
        Duration::from_secs(self.keepalive_secs)
    }

    /// Validate WebSocket configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.autoping_secs == 0 {
            return Err(ValidationError::InvalidInterval("websocket.autoping_secs"));
        }
        if self.keepalive_secs == 0 {
            return Err(ValidationError::InvalidInterval("websocket.keepalive_secs"));
        }
        if self.outbound_capacity == 0 {
            return Err(ValidationError::InvalidCapacity);
        }
        Ok(())
    }
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            autoping_secs: default_autoping(),
            keepalive_secs: default_keepalive(),
            outbound_capacity: default_outbound_capacity(),
        }
    }
}

fn default_autoping() -> u64 {
    30
}

fn default_keepalive() -> u64 {
    5
}

fn default_outbound_capacity() -> usize {
    128
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_config_defaults() {
        let config = WebSocketConfig::default();
        assert_eq!(config.autoping(), Duration::from_secs(30));
        assert_eq!(config.keepalive(), Duration::from_secs(5));
        assert_eq!(config.outbound_capacity, 128);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_intervals() {
        let config = WebSocketConfig {
            autoping_secs: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidInterval("websocket.autoping_secs"))
        );

        let config = WebSocketConfig {
            keepalive_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_capacity() {
        let config = WebSocketConfig {
            outbound_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidCapacity));
    }
}
