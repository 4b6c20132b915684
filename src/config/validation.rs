use super::Config;
use anyhow::Result;
use url::Url;

/// Validation errors for configuration.
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate a configuration object.
pub fn validate_config(config: &Config) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();

    if config.search.debounce_ms == 0 {
        errors.push(ConfigValidationError {
            path: "search.debounceMs".to_string(),
            message: "Debounce delay must be greater than 0".to_string(),
        });
    }

    match Url::parse(&config.search.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ConfigValidationError {
            path: "search.baseUrl".to_string(),
            message: format!("Unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ConfigValidationError {
            path: "search.baseUrl".to_string(),
            message: format!("Invalid URL: {e}"),
        }),
    }

    if config.logging.level.trim().is_empty() {
        errors.push(ConfigValidationError {
            path: "logging.level".to_string(),
            message: "Log level must not be empty".to_string(),
        });
    }

    errors
}

/// Validate configuration and return Result.
pub fn validate_config_object(config: &Config) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        anyhow::bail!("Configuration validation failed:\n{}", messages.join("\n"));
    }
}
