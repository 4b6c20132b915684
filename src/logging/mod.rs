use crate::config::LoggingConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// A non-empty, parseable `RUST_LOG` replaces the configured level entirely.
pub fn init(config: &LoggingConfig) {
    let filter = build_filter(&config.level, std::env::var("RUST_LOG").ok().as_deref());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_filter(level: &str, rust_log: Option<&str>) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return filter;
        }
    }

    EnvFilter::try_new(format!("searchbox={}", level.trim()))
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::INFO.into()))
}
