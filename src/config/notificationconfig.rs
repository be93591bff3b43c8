use std::time::Duration;

use serde::Deserialize;

fn default_short() -> u64 {
    2000
}

fn default_long() -> u64 {
    3500
}

/// How long the notifications at the bottom of the login screen stay visible, in milliseconds
#[derive(Clone, Debug, Deserialize)]
pub struct NotificationConfig {
    /// Used for input validation messages
    #[serde(default = "default_short")]
    pub short_ms: u64,
    /// Used for login results
    #[serde(default = "default_long")]
    pub long_ms: u64,
}

impl NotificationConfig {
    pub fn short(&self) -> Duration {
        Duration::from_millis(self.short_ms)
    }
    pub fn long(&self) -> Duration {
        Duration::from_millis(self.long_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            short_ms: default_short(),
            long_ms: default_long(),
        }
    }
}
