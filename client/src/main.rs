//! Model API test harness CLI entry point

use clap::Parser;
use model_api_tests::{cli, logging};

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
