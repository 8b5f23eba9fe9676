//! Command handler for the `dockgen` binary

use super::commands::CliArgs;
use super::output::{OutputFormat, OutputFormatter};
use crate::config::DockgenConfig;
use crate::llm::OllamaCliClient;
use crate::pipeline::{
    FixedDecider, GenerationOrchestrator, GenerationSettings, RepairDecider, RunReport,
    TerminalDecider,
};
use crate::scan::ScanConfig;
use crate::util::logging::{config_from_env, parse_level, LoggingConfig};
use crate::validation::{ArtifactValidator, DockerCliEngine};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, Level};

/// Dockerfile generated and valid
pub const EXIT_SUCCESS: i32 = 0;
/// The run finished without a valid Dockerfile
pub const EXIT_GENERATION_FAILED: i32 = 1;
/// Bad configuration, bad project path or an output that could not be written
pub const EXIT_FATAL: i32 = 2;

/// Logging settings for a run: `--log-level`, then `-v`/`-q`, then the
/// environment
pub fn logging_config(args: &CliArgs) -> LoggingConfig {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var("DOCKGEN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        parse_level(&level_str)
    };

    let mut config = config_from_env(level);
    if let Some(log_file) = &args.log_file {
        config.log_file = Some(log_file.clone());
    }
    config
}

/// Environment configuration with command-line overrides applied
pub fn build_config(args: &CliArgs) -> DockgenConfig {
    let mut config = DockgenConfig::default();

    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(engine) = &args.engine {
        config.engine_command = engine.clone();
    }
    if let Some(secs) = args.model_timeout {
        config.model_timeout_secs = secs;
    }
    if let Some(secs) = args.engine_timeout {
        config.engine_timeout_secs = secs;
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.to_lowercase();
    }

    config
}

pub fn select_decider(args: &CliArgs) -> Box<dyn RepairDecider> {
    if args.yes {
        Box::new(FixedDecider(true))
    } else if args.no_repair {
        Box::new(FixedDecider(false))
    } else {
        Box::new(TerminalDecider)
    }
}

pub fn exit_code(report: &RunReport) -> i32 {
    if report.succeeded() {
        EXIT_SUCCESS
    } else {
        EXIT_GENERATION_FAILED
    }
}

pub async fn handle_generate(args: &CliArgs) -> i32 {
    let config = build_config(args);
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your DOCKGEN_* environment variables and command-line arguments.");
        return EXIT_FATAL;
    }
    debug!(config = ?config.to_display_map(), "Effective configuration");

    let project_path: PathBuf = match args.path.canonicalize() {
        Ok(path) if path.is_dir() => path,
        Ok(path) => {
            error!("Project path is not a directory: {}", path.display());
            return EXIT_FATAL;
        }
        Err(e) => {
            error!("Project path {} is not usable: {}", args.path.display(), e);
            return EXIT_FATAL;
        }
    };

    let client = Arc::new(OllamaCliClient::with_timeout(
        config.model_command.clone(),
        config.model_timeout(),
    ));
    let engine = Arc::new(DockerCliEngine::with_timeout(
        config.engine_command.clone(),
        config.engine_timeout(),
    ));
    info!(
        model = %config.model,
        runtime = %config.model_command,
        engine = %config.engine_command,
        "Using local model runtime"
    );

    let orchestrator = GenerationOrchestrator::new(
        client,
        ArtifactValidator::new(engine),
        select_decider(args),
    );

    let mut settings = GenerationSettings::new(project_path, config.model.clone())
        .with_dockerfile_path(args.output.clone())
        .with_scan_config(ScanConfig::with_max_chars(config.max_context_size));
    if args.compose {
        settings = settings.with_compose_path(args.compose_output.clone());
    }

    let report = match orchestrator.run(&settings).await {
        Ok(report) => report,
        Err(e) => {
            error!("{:#}", e);
            return EXIT_FATAL;
        }
    };

    let format: OutputFormat = args.format.into();
    match OutputFormatter::new(format).format(&report) {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            error!("Failed to format run summary: {}", e);
            return EXIT_FATAL;
        }
    }

    exit_code(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    fn parse(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["dockgen", "--path", "."];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    #[serial]
    fn test_overrides_apply() {
        let config = build_config(&parse(&[
            "--model",
            "llama3",
            "--engine",
            "podman",
            "--model-timeout",
            "42",
            "--engine-timeout",
            "84",
            "--log-level",
            "DEBUG",
        ]));

        assert_eq!(config.model, "llama3");
        assert_eq!(config.engine_command, "podman");
        assert_eq!(config.model_timeout_secs, 42);
        assert_eq!(config.engine_timeout_secs, 84);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_zero_timeout_fails_validation() {
        let config = build_config(&parse(&["--model-timeout", "0"]));
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_logging_level_precedence() {
        assert_eq!(logging_config(&parse(&["--log-level", "warn", "-v"])).level, Level::WARN);
        assert_eq!(logging_config(&parse(&["-v"])).level, Level::DEBUG);
        assert_eq!(logging_config(&parse(&["-q"])).level, Level::ERROR);
    }

    #[test]
    #[serial]
    fn test_logging_file_flag() {
        let config = logging_config(&parse(&["--log-file", "dockgen.log"]));
        assert_eq!(config.log_file, Some(PathBuf::from("dockgen.log")));
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_project_is_fatal() {
        let args = CliArgs::parse_from(["dockgen", "--path", "/nonexistent/dockgen/project"]);
        assert_eq!(handle_generate(&args).await, EXIT_FATAL);
    }
}
