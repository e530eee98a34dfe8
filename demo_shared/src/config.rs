//! Configuration system.
//!
//! Loads client configuration from JSON strings (file IO left to app).

use serde::{Deserialize, Serialize};

/// Root client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server address, e.g. `127.0.0.1:5000`.
    pub server_addr: String,
    /// Rate at which queued inbound state is drained and applied.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
}

fn default_tick_hz() -> u32 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:5000".to_string(),
            tick_hz: default_tick_hz(),
        }
    }
}

impl ClientConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
