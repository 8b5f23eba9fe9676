use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Generates a Dockerfile (and optionally a docker-compose.yml) for a project
/// using a locally hosted language model
#[derive(Parser, Debug)]
#[command(
    name = "dockgen",
    about = "Generate and validate a Dockerfile for a project with a local language model",
    version,
    long_about = "dockgen scans a project directory, guesses its language and framework, \
                  asks a locally hosted model for a Dockerfile and validates the result \
                  with the container engine. A Dockerfile that fails validation can be \
                  sent back to the model once for repair.\n\n\
                  Examples:\n  \
                  dockgen --path ./my-app\n  \
                  dockgen --path ./my-app --model llama3 --output build/Dockerfile\n  \
                  dockgen --path ./my-app --compose --yes --format json"
)]
pub struct CliArgs {
    #[arg(long, value_name = "DIR", help = "Root of the project to scan")]
    pub path: PathBuf,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model passed to the model runtime [default: phi3, env: DOCKGEN_MODEL]"
    )]
    pub model: Option<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        default_value = "Dockerfile",
        help = "Where to write the generated Dockerfile"
    )]
    pub output: PathBuf,

    #[arg(long, help = "Also generate and validate a docker-compose.yml")]
    pub compose: bool,

    #[arg(
        long,
        value_name = "FILE",
        default_value = "docker-compose.yml",
        help = "Where to write the generated compose file (with --compose)"
    )]
    pub compose_output: PathBuf,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Timeout for each model invocation [default: 300, env: DOCKGEN_MODEL_TIMEOUT]"
    )]
    pub model_timeout: Option<u64>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "Timeout for each container engine check [default: 600, env: DOCKGEN_ENGINE_TIMEOUT]"
    )]
    pub engine_timeout: Option<u64>,

    #[arg(
        long,
        value_name = "COMMAND",
        help = "Container engine executable [default: docker, env: DOCKGEN_ENGINE]"
    )]
    pub engine: Option<String>,

    #[arg(
        short = 'y',
        long,
        conflicts_with = "no_repair",
        help = "Attempt the repair without asking"
    )]
    pub yes: bool,

    #[arg(long, help = "Never attempt a repair")]
    pub no_repair: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Format of the run summary"
    )]
    pub format: OutputFormatArg,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(long, value_name = "FILE", help = "Also append logs to this file")]
    pub log_file: Option<PathBuf>,

    #[arg(short = 'v', long, help = "Verbose output (debug logging)")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - only errors are logged"
    )]
    pub quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
