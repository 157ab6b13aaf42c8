//! Per-connection limits.

use super::defaults::{default_max_line_len, default_send_queue, default_write_timeout_ms};
use serde::Deserialize;
use std::time::Duration;

/// Per-connection limits configuration.
///
/// These bound what one client can cost the relay: how long a line may be,
/// how many fan-out lines may queue up for it, and how long a single socket
/// write may block before the connection is dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum protocol line length in bytes, newline included (default: 1024).
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Outbound queue capacity per connection (default: 256).
    #[serde(default = "default_send_queue")]
    pub send_queue: usize,
    /// Write deadline in milliseconds (default: 5000).
    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,
}

impl LimitsConfig {
    /// Write deadline as a `Duration`.
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_len: default_max_line_len(),
            send_queue: default_send_queue(),
            write_timeout_ms: default_write_timeout_ms(),
        }
    }
}
