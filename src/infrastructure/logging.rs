use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Directives used when `RUST_LOG` is unset: the configured level for this
/// crate, warnings only from dependencies
fn default_directives(level: &str) -> String {
    format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level)
}

fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)))
}

/// Install the global subscriber.
///
/// Output goes to stderr so stdout carries only command results. A second
/// call leaves the first subscriber in place.
pub fn init_logging(config: &LoggingConfig) {
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    let registry = tracing_subscriber::registry().with(build_filter(config));

    let installed = match config.format {
        LogFormat::Json => registry.with(layer.json().flatten_event(true)).try_init(),
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_scope_level_to_crate() {
        assert_eq!(default_directives("debug"), "warn,agent_workflow_config=debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LoggingConfig {
            level: "info".to_string(),
            format: LogFormat::Json,
        };

        init_logging(&config);
        init_logging(&LoggingConfig {
            format: LogFormat::Pretty,
            ..config
        });
    }
}
