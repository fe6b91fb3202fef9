//! quota-sentinel - provider quota monitor with presence propagation

#![allow(missing_docs)]

use clap::Parser;
use quota_sentinel::server;
use quota_sentinel::utils::EnvUtils;
use std::path::PathBuf;
use std::process::ExitCode;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "quota-sentinel", version, about)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "QUOTA_SENTINEL_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    EnvUtils::load_dotenv();
    let cli = Cli::parse();

    match server::run_service(cli.config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Logging may not be initialized yet when configuration fails
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
