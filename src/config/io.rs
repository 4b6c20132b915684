use super::Config;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Maximum size for a config file (1 MB).
pub const MAX_CONFIG_FILE_BYTES: u64 = 1024 * 1024;

/// Read a configuration file, choosing the parser from its extension.
///
/// `.yaml`/`.yml` and `.toml` are parsed as such; anything else is tried
/// as JSON5 first and plain JSON second.
pub fn read_config_file(path: &Path) -> Result<Config> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Cannot stat config file '{}'", path.display()))?;

    if metadata.len() > MAX_CONFIG_FILE_BYTES {
        bail!(
            "Config file '{}' is {} bytes, exceeds limit of {} bytes",
            path.display(),
            metadata.len(),
            MAX_CONFIG_FILE_BYTES,
        );
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        Some("toml") => toml::from_str(&content)?,
        _ => match json5::from_str(&content) {
            Ok(config) => config,
            Err(_) => serde_json::from_str(&content)?,
        },
    };

    Ok(config)
}

/// Write configuration to a JSON file.
pub fn write_config_file(path: &Path, config: &Config) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn read_json_config() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("searchbox.json");
        fs::write(&file, r#"{"search": {"debounceMs": 250}}"#).unwrap();

        let config = read_config_file(&file).unwrap();
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.search.base_url, crate::config::DEFAULT_BASE_URL);
    }

    #[test]
    fn read_json5_config() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("searchbox.json");
        fs::write(
            &file,
            "{\n  // local mock\n  search: { baseUrl: 'http://localhost:3000', },\n}\n",
        )
        .unwrap();

        let config = read_config_file(&file).unwrap();
        assert_eq!(config.search.base_url, "http://localhost:3000");
    }

    #[test]
    fn read_yaml_config() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("searchbox.yaml");
        fs::write(&file, "logging:\n  level: debug\n  json: true\n").unwrap();

        let config = read_config_file(&file).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn read_toml_config() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("searchbox.toml");
        fs::write(&file, "[search]\ndebounceMs = 900\nuserAgent = \"sb/1\"\n").unwrap();

        let config = read_config_file(&file).unwrap();
        assert_eq!(config.search.debounce_ms, 900);
        assert_eq!(config.search.user_agent.as_deref(), Some("sb/1"));
    }

    #[test]
    fn reject_oversized_config() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("huge.json");
        let content = "x".repeat((MAX_CONFIG_FILE_BYTES + 1) as usize);
        fs::write(&file, content).unwrap();

        let result = read_config_file(&file);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("exceeds limit"));
    }

    #[test]
    fn write_then_read_defaults() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("out.json");
        write_config_file(&file, &Config::default()).unwrap();

        let config = read_config_file(&file).unwrap();
        assert_eq!(config.search, Config::default().search);
    }
}
