//! Logging setup for the CLI.
//!
//! Logs go to stderr so `show --json` output on stdout stays parseable.
//! `RUST_LOG`, when set, takes precedence over the `-v` level.

use std::io;

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level used when `RUST_LOG` is unset.
    pub level: Level,
    /// Whether to include the module path in log lines.
    pub with_target: bool,
    /// Whether to use ANSI colors.
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_target: false,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// Maps the `-v` count to a level.
    ///
    /// - 0: warn
    /// - 1 (`-v`): info
    /// - 2 (`-vv`): debug
    /// - 3+: trace
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            with_target: verbosity >= 2,
            ..Default::default()
        }
    }
}

/// Installs the global subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target)
        .without_time();

    tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .init();
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_directive(level)))
}

fn level_directive(level: Level) -> String {
    format!("copilot_core={level},copilot_infrastructure={level},copilot_application={level},cpa_copilot={level}")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogConfig::from_verbosity(0).level, Level::WARN);
        assert_eq!(LogConfig::from_verbosity(1).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(2).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(9).level, Level::TRACE);
        assert!(LogConfig::from_verbosity(2).with_target);
    }

    #[test]
    fn test_level_directive_covers_workspace_crates() {
        let directive = level_directive(Level::DEBUG);
        assert!(directive.contains("copilot_application=debug"));
        assert!(directive.contains("cpa_copilot=debug"));
    }
}
