use crate::config::default_bridge_port;

use serde::{Deserialize, Serialize};

/// WebSocket bridge to the UI process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Localhost port the bridge listens on.
    #[serde(default = "default_bridge_port")]
    pub port: u16,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            port: default_bridge_port(),
        }
    }
}
