//! Realtime hub configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_QUEUE_CAPACITY: usize = 65_536;
const MAX_CLOSE_GRACE_SECS: u64 = 60;

/// Per-connection queue sizing and shutdown timing.
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Frames buffered per connection before the listener is evicted
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Seconds the outbound pump gets to flush its close frame
    #[serde(default = "default_close_grace")]
    pub close_grace_secs: u64,
}

impl HubConfig {
    pub fn close_grace(&self) -> Duration {
        Duration::from_secs(self.close_grace_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.queue_capacity == 0 || self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ValidationError::InvalidQueueCapacity(MAX_QUEUE_CAPACITY));
        }
        if self.close_grace_secs == 0 || self.close_grace_secs > MAX_CLOSE_GRACE_SECS {
            return Err(ValidationError::InvalidCloseGrace(MAX_CLOSE_GRACE_SECS));
        }
        Ok(())
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            close_grace_secs: default_close_grace(),
        }
    }
}

fn default_queue_capacity() -> usize {
    256
}

fn default_close_grace() -> u64 {
    5
}
