#![forbid(unsafe_code)]

//! Logging setup.
//!
//! Library code only emits `tracing` events. Binaries call [`init_logging`]
//! once to install a `tracing-subscriber` fmt subscriber filtered by the
//! `PANELFX_LOG` environment variable (same syntax as `RUST_LOG`).

use std::fmt;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "PANELFX_LOG";

/// Filter used when `PANELFX_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Where and how to log.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub file: Option<PathBuf>,
    /// Filter used when `PANELFX_LOG` is unset. Defaults to `info`.
    pub default_filter: Option<String>,
}

/// Error returned when logging could not be installed.
#[derive(Debug)]
pub enum LogInitError {
    /// The log file could not be opened.
    Io(std::io::Error),
    /// A global subscriber is already installed.
    AlreadyInstalled(String),
}

impl fmt::Display for LogInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogInitError::Io(e) => write!(f, "cannot open log file: {e}"),
            LogInitError::AlreadyInstalled(msg) => write!(f, "logging already initialized: {msg}"),
        }
    }
}

impl std::error::Error for LogInitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogInitError::Io(e) => Some(e),
            LogInitError::AlreadyInstalled(_) => None,
        }
    }
}

impl From<std::io::Error> for LogInitError {
    fn from(e: std::io::Error) -> Self {
        LogInitError::Io(e)
    }
}

/// Build the filter from `PANELFX_LOG`, falling back to `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber.
pub fn init_logging(config: &LogConfig) -> Result<(), LogInitError> {
    let filter = env_filter(config.default_filter.as_deref().unwrap_or(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match (&config.file, config.format) {
        (Some(path), format) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let builder = builder.with_writer(Mutex::new(file)).with_ansi(false);
            match format {
                LogFormat::Pretty => builder.try_init(),
                LogFormat::Json => builder.json().try_init(),
            }
        }
        (None, LogFormat::Pretty) => builder.with_writer(std::io::stderr).try_init(),
        (None, LogFormat::Json) => builder.with_writer(std::io::stderr).json().try_init(),
    };

    result.map_err(|e| LogInitError::AlreadyInstalled(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_format() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn second_init_reports_already_installed() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            format: LogFormat::Json,
            file: Some(dir.path().join("panel.log")),
            default_filter: Some("warn".into()),
        };
        // Another test in this binary may have installed a subscriber first.
        let first = init_logging(&config);
        let second = init_logging(&config);
        assert!(matches!(second, Err(LogInitError::AlreadyInstalled(_))));
        if first.is_ok() {
            assert!(dir.path().join("panel.log").exists());
        }
    }

    #[test]
    fn unopenable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            file: Some(dir.path().join("no/such/dir/panel.log")),
            ..LogConfig::default()
        };
        assert!(matches!(init_logging(&config), Err(LogInitError::Io(_))));
    }
}
