//! Structured logging setup for dockgen
//!
//! Every diagnostic in the crate goes through `tracing`. This module installs the
//! subscriber: an `EnvFilter`, a console sink on stderr (pretty or JSON) and an
//! optional plain-text file sink.
//!
//! # Example
//!
//! ```no_run
//! use dockgen::util::logging;
//!
//! logging::init_from_env();
//!
//! use tracing::{info, warn};
//!
//! info!(path = "/srv/app", "Scanning project");
//! warn!("Compose file needs manual revision");
//! ```

use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Mutex, Once};
use tracing::Level;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

static INIT: Once = Once::new();

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output on the console sink
    pub use_json: bool,

    /// Include the module target (e.g., dockgen::pipeline) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,

    /// Additional plain-text sink, appended to on every run
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
            log_file: None,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON console output with source locations, for log collectors
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            log_file: None,
        }
    }

    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            use_json: false,
            include_target: true,
            include_location: false,
            log_file: None,
        }
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }
}

/// Parses a log level from a string
///
/// Unknown names fall back to `Level::INFO`.
///
/// ```
/// use dockgen::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("WARN"), Level::WARN);
/// assert_eq!(parse_level("loud"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

fn build_filter(level: Level) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }

    let directive = format!("dockgen={}", level);
    EnvFilter::new(directive)
}

/// Initializes the logging system
///
/// Only the first call has an effect; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut sinks: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

        let console = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location);
        if config.use_json {
            sinks.push(console.json().boxed());
        } else {
            sinks.push(console.boxed());
        }

        if let Some(path) = &config.log_file {
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => sinks.push(
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(config.include_target)
                        .with_writer(Mutex::new(file))
                        .boxed(),
                ),
                Err(e) => eprintln!(
                    "Cannot open log file {}: {}. Logging to console only.",
                    path.display(),
                    e
                ),
            }
        }

        tracing_subscriber::registry()
            .with(sinks)
            .with(build_filter(config.level))
            .init();
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Initializes logging from `DOCKGEN_LOG_LEVEL`, `DOCKGEN_LOG_JSON` and
/// `DOCKGEN_LOG_FILE`
pub fn init_from_env() {
    let level_str = env::var("DOCKGEN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    init_logging(config_from_env(parse_level(&level_str)));
}

/// Environment-derived sink settings around an already chosen level
pub fn config_from_env(level: Level) -> LoggingConfig {
    let use_json = env::var("DOCKGEN_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);
    let log_file = env::var("DOCKGEN_LOG_FILE").ok().map(PathBuf::from);

    LoggingConfig {
        level,
        use_json,
        log_file,
        ..Default::default()
    }
}
