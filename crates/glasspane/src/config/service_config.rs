use serde::{Deserialize, Serialize};

/// External conversational service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Command and arguments used to spawn the service client.
    pub command: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            command: vec!["gemini".to_string()],
        }
    }
}
