//! Logging configuration.
//!
//! Precedence, highest first: CLI flags (`-v`, `-q`, `--log-format`),
//! `UMBRELLA_LOG` / `UMBRELLA_LOG_FORMAT`, `RUST_LOG`, built-in defaults.

/// Log level name (`trace` .. `off`).
pub const ENV_LOG_LEVEL: &str = "UMBRELLA_LOG";
/// `human` or `jsonl`.
pub const ENV_LOG_FORMAT: &str = "UMBRELLA_LOG_FORMAT";
/// `0` / `false` / `off` removes timestamps from human output.
pub const ENV_LOG_TIMESTAMPS: &str = "UMBRELLA_LOG_TIMESTAMPS";

const ENV_RUST_LOG: &str = "RUST_LOG";

/// Where and how log lines are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Console lines for people.
    #[default]
    Human,
    /// One JSON object per line.
    Jsonl,
}

impl LogFormat {
    /// Parse an environment value; accepts a few common aliases.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "human" | "text" | "pretty" => Some(LogFormat::Human),
            "jsonl" | "json" => Some(LogFormat::Jsonl),
            _ => None,
        }
    }
}

/// Verbosity threshold. Ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    /// The report on stdout is the primary output, so only problems are logged.
    #[default]
    Warn,
    Error,
    Off,
}

impl LogLevel {
    const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Off,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    /// Parse a level name, case-insensitively. `warning` is accepted.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        if value == "warning" {
            return Some(LogLevel::Warn);
        }
        Self::ALL.into_iter().find(|level| level.as_str() == value)
    }

    /// Most verbose level named by any directive of a `RUST_LOG` value.
    ///
    /// `um_core=debug,warn` yields `Debug`; target prefixes are ignored
    /// because every event is filtered by level alone.
    pub fn from_directives(value: &str) -> Option<Self> {
        value
            .split(',')
            .filter_map(|directive| directive.rsplit('=').next())
            .filter_map(LogLevel::parse)
            .min()
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        use tracing_subscriber::filter::LevelFilter;
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Prefix human lines with a timestamp.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::default(),
            level: LogLevel::default(),
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Resolve from the process environment and CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), cli_level, cli_format)
    }

    /// Resolve with an injectable environment lookup.
    pub fn from_lookup<F>(
        lookup: F,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = cli_level
            .or_else(|| lookup(ENV_LOG_LEVEL).and_then(|v| LogLevel::parse(&v)))
            .or_else(|| lookup(ENV_RUST_LOG).and_then(|v| LogLevel::from_directives(&v)))
            .unwrap_or_default();

        let format = cli_format
            .or_else(|| lookup(ENV_LOG_FORMAT).and_then(|v| LogFormat::parse(&v)))
            .unwrap_or_default();

        let timestamps = !matches!(
            lookup(ENV_LOG_TIMESTAMPS)
                .map(|v| v.trim().to_ascii_lowercase())
                .as_deref(),
            Some("0" | "false" | "off" | "no")
        );

        LogConfig {
            format,
            level,
            timestamps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn level_names() {
        for level in LogLevel::ALL {
            assert_eq!(LogLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(LogLevel::parse(" WARNING "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
    }

    #[test]
    fn rust_log_directives_pick_most_verbose() {
        assert_eq!(LogLevel::from_directives("um_core=debug,warn"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_directives("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_directives("um_core"), None);
    }

    #[test]
    fn format_aliases() {
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Jsonl));
        assert_eq!(LogFormat::parse("Pretty"), Some(LogFormat::Human));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn umbrella_log_beats_rust_log() {
        let config = LogConfig::from_lookup(
            env(&[("UMBRELLA_LOG", "error"), ("RUST_LOG", "debug")]),
            None,
            None,
        );
        assert_eq!(config.level, LogLevel::Error);
    }

    #[test]
    fn rust_log_fallback() {
        let config = LogConfig::from_lookup(env(&[("RUST_LOG", "um_core=debug")]), None, None);
        assert_eq!(config.level, LogLevel::Debug);
    }

    #[test]
    fn cli_overrides_env() {
        let config = LogConfig::from_lookup(
            env(&[("UMBRELLA_LOG", "error"), ("UMBRELLA_LOG_FORMAT", "jsonl")]),
            Some(LogLevel::Trace),
            Some(LogFormat::Human),
        );
        assert_eq!(config.level, LogLevel::Trace);
        assert_eq!(config.format, LogFormat::Human);
    }

    #[test]
    fn timestamps_can_be_disabled() {
        let config = LogConfig::from_lookup(env(&[("UMBRELLA_LOG_TIMESTAMPS", "off")]), None, None);
        assert!(!config.timestamps);
        let config = LogConfig::from_lookup(env(&[("UMBRELLA_LOG_TIMESTAMPS", "1")]), None, None);
        assert!(config.timestamps);
    }

    #[test]
    fn defaults_without_env() {
        assert_eq!(LogConfig::from_lookup(env(&[]), None, None), LogConfig::default());
        assert_eq!(LogConfig::default().level, LogLevel::Warn);
    }
}
