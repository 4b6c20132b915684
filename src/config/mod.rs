mod defaults;
mod io;
mod types;
mod validation;

pub use defaults::*;
pub use io::*;
pub use types::*;
pub use validation::*;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Top-level searchbox configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file, environment, and defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.map(PathBuf::from).or_else(find_config_file);

        let mut config = match config_path {
            Some(ref p) if p.exists() => {
                info!("Loading config from {}", p.display());
                read_config_file(p)?
            }
            Some(ref p) => {
                warn!("Config file {} not found, using defaults", p.display());
                Config::default()
            }
            None => {
                info!("No config file found, using defaults");
                Config::default()
            }
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Write default configuration to a file.
    pub fn write_default(path: &str) -> Result<()> {
        write_config_file(Path::new(path), &Config::default())
    }

    /// Apply environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("SEARCHBOX_BASE_URL") {
            self.search.base_url = url;
        }

        if let Some(ms) = lookup("SEARCHBOX_DEBOUNCE_MS") {
            match ms.parse() {
                Ok(ms) => self.search.debounce_ms = ms,
                Err(_) => warn!("Ignoring invalid SEARCHBOX_DEBOUNCE_MS: {}", ms),
            }
        }

        if let Some(level) = lookup("SEARCHBOX_LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}

/// Find the configuration file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    let candidates = [
        PathBuf::from(DEFAULT_CONFIG_FILE),
        PathBuf::from("searchbox.yaml"),
        PathBuf::from("searchbox.yml"),
        PathBuf::from("searchbox.toml"),
    ];

    for path in &candidates {
        if path.exists() {
            return Some(path.clone());
        }
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".searchbox").join("config.json");
        if home_config.exists() {
            return Some(home_config);
        }
    }

    None
}
