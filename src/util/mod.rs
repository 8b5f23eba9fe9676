//! Utility modules for dockgen
//!
//! - Structured logging setup and configuration
//! - Bounded external process execution

pub mod logging;
pub mod process;

pub use logging::{init_default, init_from_env, init_logging, LoggingConfig};
pub use process::{run_process, ProcessError, ProcessOutput};
