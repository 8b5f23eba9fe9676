use dockgen::cli::commands::CliArgs;
use dockgen::cli::handlers::{handle_generate, logging_config};
use dockgen::util::init_logging;
use dockgen::VERSION;

use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging(logging_config(&args));

    debug!("dockgen v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = handle_generate(&args).await;

    std::process::exit(exit_code);
}
