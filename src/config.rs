//! Configuration management for dockgen
//!
//! Settings are loaded from environment variables with defaults; command-line
//! flags override them afterwards (see `cli::handlers`).
//!
//! # Environment Variables
//!
//! - `DOCKGEN_MODEL`: Model passed to the model runtime - default: "phi3"
//! - `DOCKGEN_MODEL_COMMAND`: Model runtime executable - default: "ollama"
//! - `DOCKGEN_ENGINE`: Container engine executable - default: "docker"
//! - `DOCKGEN_MAX_CONTEXT_SIZE`: Project context cap in characters - default: "8000"
//! - `DOCKGEN_MODEL_TIMEOUT`: Model invocation timeout in seconds - default: "300"
//! - `DOCKGEN_ENGINE_TIMEOUT`: Container engine check timeout in seconds - default: "600"
//! - `DOCKGEN_LOG_LEVEL`: Logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use dockgen::DockgenConfig;
//!
//! let mut config = DockgenConfig::default();
//! config.model = "llama3".to_string();
//! config.validate().expect("Invalid configuration");
//! ```

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MODEL: &str = "phi3";
const DEFAULT_MODEL_COMMAND: &str = "ollama";
const DEFAULT_ENGINE_COMMAND: &str = "docker";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_MAX_CONTEXT_SIZE: usize = 8000;
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 300;
const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 600;

const MAX_CONTEXT_SIZE_LIMIT: usize = 1_048_576;
const MAX_TIMEOUT_SECS: u64 = 3600;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Main configuration structure for dockgen
#[derive(Debug, Clone)]
pub struct DockgenConfig {
    /// Model identifier handed to the model runtime
    pub model: String,

    /// Executable of the model runtime (invoked as `<cmd> run <model>`)
    pub model_command: String,

    /// Executable of the container engine
    pub engine_command: String,

    /// Maximum size of the scanned project context, in characters
    pub max_context_size: usize,

    /// Timeout for a single model invocation
    pub model_timeout_secs: u64,

    /// Timeout for a single container engine check
    pub engine_timeout_secs: u64,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for DockgenConfig {
    /// Loads DOCKGEN_* environment variables, falling back to defaults for
    /// anything missing or unparsable
    fn default() -> Self {
        let model = env::var("DOCKGEN_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let model_command = env::var("DOCKGEN_MODEL_COMMAND")
            .unwrap_or_else(|_| DEFAULT_MODEL_COMMAND.to_string());

        let engine_command =
            env::var("DOCKGEN_ENGINE").unwrap_or_else(|_| DEFAULT_ENGINE_COMMAND.to_string());

        let max_context_size = env::var("DOCKGEN_MAX_CONTEXT_SIZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_CONTEXT_SIZE);

        let model_timeout_secs = env::var("DOCKGEN_MODEL_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_MODEL_TIMEOUT_SECS);

        let engine_timeout_secs = env::var("DOCKGEN_ENGINE_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_ENGINE_TIMEOUT_SECS);

        let log_level = env::var("DOCKGEN_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            model,
            model_command,
            engine_command,
            max_context_size,
            model_timeout_secs,
            engine_timeout_secs,
            log_level,
        }
    }
}

impl DockgenConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` describing the first bad value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model name cannot be empty".to_string(),
            ));
        }
        if self.model_command.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model command cannot be empty".to_string(),
            ));
        }
        if self.engine_command.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Container engine command cannot be empty".to_string(),
            ));
        }

        if self.max_context_size == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max context size must be at least 1 character".to_string(),
            ));
        }
        if self.max_context_size > MAX_CONTEXT_SIZE_LIMIT {
            return Err(ConfigError::ValidationFailed(
                "Max context size cannot exceed 1MiB".to_string(),
            ));
        }

        for (name, value) in [
            ("Model timeout", self.model_timeout_secs),
            ("Engine timeout", self.engine_timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} must be at least 1 second",
                    name
                )));
            }
            if value > MAX_TIMEOUT_SECS {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} cannot exceed 1 hour",
                    name
                )));
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    pub fn engine_timeout(&self) -> Duration {
        Duration::from_secs(self.engine_timeout_secs)
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("model".to_string(), self.model.clone());
        map.insert("model_command".to_string(), self.model_command.clone());
        map.insert("engine_command".to_string(), self.engine_command.clone());
        map.insert(
            "max_context_size".to_string(),
            self.max_context_size.to_string(),
        );
        map.insert(
            "model_timeout_secs".to_string(),
            self.model_timeout_secs.to_string(),
        );
        map.insert(
            "engine_timeout_secs".to_string(),
            self.engine_timeout_secs.to_string(),
        );
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

impl fmt::Display for DockgenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dockgen Configuration:")?;
        writeln!(f, "  Model: {} (via {})", self.model, self.model_command)?;
        writeln!(f, "  Container Engine: {}", self.engine_command)?;
        writeln!(f, "  Max Context Size: {} chars", self.max_context_size)?;
        writeln!(f, "  Model Timeout: {}s", self.model_timeout_secs)?;
        writeln!(f, "  Engine Timeout: {}s", self.engine_timeout_secs)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn valid_config() -> DockgenConfig {
        DockgenConfig {
            model: "phi3".to_string(),
            model_command: "ollama".to_string(),
            engine_command: "docker".to_string(),
            max_context_size: 8000,
            model_timeout_secs: 300,
            engine_timeout_secs: 600,
            log_level: "info".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset("DOCKGEN_MODEL"),
            EnvGuard::unset("DOCKGEN_MODEL_COMMAND"),
            EnvGuard::unset("DOCKGEN_ENGINE"),
            EnvGuard::unset("DOCKGEN_MAX_CONTEXT_SIZE"),
            EnvGuard::unset("DOCKGEN_MODEL_TIMEOUT"),
            EnvGuard::unset("DOCKGEN_ENGINE_TIMEOUT"),
            EnvGuard::unset("DOCKGEN_LOG_LEVEL"),
        ];

        let config = DockgenConfig::default();

        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.model_command, DEFAULT_MODEL_COMMAND);
        assert_eq!(config.engine_command, DEFAULT_ENGINE_COMMAND);
        assert_eq!(config.max_context_size, DEFAULT_MAX_CONTEXT_SIZE);
        assert_eq!(config.model_timeout_secs, DEFAULT_MODEL_TIMEOUT_SECS);
        assert_eq!(config.engine_timeout_secs, DEFAULT_ENGINE_TIMEOUT_SECS);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = vec![
            EnvGuard::set("DOCKGEN_MODEL", "llama3"),
            EnvGuard::set("DOCKGEN_ENGINE", "podman"),
            EnvGuard::set("DOCKGEN_MAX_CONTEXT_SIZE", "16000"),
            EnvGuard::set("DOCKGEN_MODEL_TIMEOUT", "90"),
            EnvGuard::set("DOCKGEN_LOG_LEVEL", "DEBUG"),
        ];

        let config = DockgenConfig::default();

        assert_eq!(config.model, "llama3");
        assert_eq!(config.engine_command, "podman");
        assert_eq!(config.max_context_size, 16_000);
        assert_eq!(config.model_timeout_secs, 90);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_unparsable_numbers_fall_back_to_defaults() {
        let _guards = vec![
            EnvGuard::set("DOCKGEN_MAX_CONTEXT_SIZE", "lots"),
            EnvGuard::set("DOCKGEN_ENGINE_TIMEOUT", "-5"),
        ];

        let config = DockgenConfig::default();

        assert_eq!(config.max_context_size, DEFAULT_MAX_CONTEXT_SIZE);
        assert_eq!(config.engine_timeout_secs, DEFAULT_ENGINE_TIMEOUT_SECS);
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = valid_config();
        config.model_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.engine_timeout_secs = MAX_TIMEOUT_SECS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_model() {
        let mut config = valid_config();
        config.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_context_size_bounds() {
        let mut config = valid_config();
        config.max_context_size = 0;
        assert!(config.validate().is_err());

        config.max_context_size = MAX_CONTEXT_SIZE_LIMIT + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_invalid_log_level() {
        let mut config = valid_config();
        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_display_map_and_display() {
        let config = valid_config();
        let map = config.to_display_map();
        assert_eq!(map.get("model"), Some(&"phi3".to_string()));
        assert_eq!(map.get("engine_command"), Some(&"docker".to_string()));

        let display = format!("{}", config);
        assert!(display.contains("Dockgen Configuration:"));
        assert!(display.contains("phi3"));
    }
}
