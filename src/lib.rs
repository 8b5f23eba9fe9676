//! dockgen - Dockerfile generation with a locally hosted language model
//!
//! This library scans a project directory, infers its language and framework,
//! asks a local model runtime for a Dockerfile (and optionally a
//! docker-compose.yml), and validates the result with the container engine.
//! A Dockerfile that fails validation can be sent back to the model once for
//! repair.
//!
//! # Core Concepts
//!
//! - **Context**: the size-capped concatenation of the project's recognized
//!   files, embedded in every prompt
//! - **Classification**: the inferred `(language, framework)` pair used to
//!   tailor prompt wording
//! - **Structural pre-check**: a cheap required-token check performed before
//!   the container engine is invoked
//!
//! # Example Usage
//!
//! ```no_run
//! use dockgen::llm::OllamaCliClient;
//! use dockgen::pipeline::{FixedDecider, GenerationOrchestrator, GenerationSettings};
//! use dockgen::validation::{ArtifactValidator, DockerCliEngine};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let orchestrator = GenerationOrchestrator::new(
//!     Arc::new(OllamaCliClient::default()),
//!     ArtifactValidator::new(Arc::new(DockerCliEngine::default())),
//!     Box::new(FixedDecider(true)),
//! );
//!
//! let settings = GenerationSettings::new("./my-app", "phi3");
//! let report = orchestrator.run(&settings).await?;
//! println!("Dockerfile valid: {}", report.succeeded());
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`scan`]: project walk and context assembly
//! - [`classify`]: language/framework heuristics
//! - [`prompt`]: prompt text for generation and repair
//! - [`llm`]: model runtime boundary
//! - [`validation`]: structural and container engine checks
//! - [`pipeline`]: the generate, validate, repair loop

pub mod classify;
pub mod cli;
pub mod config;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompt;
pub mod scan;
pub mod util;
pub mod validation;

pub use classify::{Classification, Language, ProjectClassifier};
pub use config::{ConfigError, DockgenConfig};
pub use llm::{BackendError, ModelClient, OllamaCliClient};
pub use pipeline::{GenerationOrchestrator, GenerationSettings, RunReport};
pub use scan::{ProjectContext, ProjectScanner, ScanError};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};
pub use validation::{ArtifactValidator, ValidationResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
