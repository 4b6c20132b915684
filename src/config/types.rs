use super::defaults::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// Search Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            debounce_ms: default_debounce_ms(),
            user_agent: None,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
