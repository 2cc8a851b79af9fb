//! Tracing subscriber setup.
//!
//! Logs go to stderr so that `runway scan` and `runway vocab` can write data
//! to stdout. `RUST_LOG` takes precedence over the configured level.

use runway_core::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Resolved logging options after CLI overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
}

impl LogSettings {
    /// `--verbose` raises the level to at least `debug`; `--json-logs` forces JSON.
    pub fn resolve(config: &LoggingConfig, verbose: bool, json_logs: bool) -> Self {
        let level = match (verbose, config.level.as_str()) {
            (true, "trace") => "trace".to_string(),
            (true, _) => "debug".to_string(),
            (false, level) => level.to_string(),
        };
        Self {
            level,
            json: json_logs || config.format == "json",
        }
    }
}

/// Install the global subscriber.
pub fn init(settings: &LogSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    if settings.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` section plus global flags.
pub fn init_from_config(config: &runway_core::Config, verbose: bool, json_logs: bool) {
    init(&LogSettings::resolve(&config.logging, verbose, json_logs));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logging(level: &str, format: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            format: format.to_string(),
        }
    }

    #[test]
    fn test_config_level_used_without_flags() {
        let s = LogSettings::resolve(&logging("warn", "pretty"), false, false);
        assert_eq!(s.level, "warn");
        assert!(!s.json);
    }

    #[test]
    fn test_verbose_raises_to_debug_but_keeps_trace() {
        assert_eq!(
            LogSettings::resolve(&logging("info", "pretty"), true, false).level,
            "debug"
        );
        assert_eq!(
            LogSettings::resolve(&logging("trace", "pretty"), true, false).level,
            "trace"
        );
    }

    #[test]
    fn test_json_from_flag_or_config() {
        assert!(LogSettings::resolve(&logging("info", "pretty"), false, true).json);
        assert!(LogSettings::resolve(&logging("info", "json"), false, false).json);
    }
}
