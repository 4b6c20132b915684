/// Default configuration constants used across the system.

/// Default search API base URL.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Default quiet period before a query is sent.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Default log level directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default config file name in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "searchbox.json";
