use std::process::ExitCode;

use clap::Parser;
use cli_smap::{ALREADY_RUNNING, Cli, is_already_running, run};
use core_smap::logging::{DEFAULT_LOG_SETTINGS, setup_logging};

fn main() -> ExitCode {
    // Load environment variables from .env file, if it exists
    dotenvy::dotenv().ok();

    setup_logging(DEFAULT_LOG_SETTINGS);

    let cli = Cli::parse();

    match run(&cli) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(error) if is_already_running(&error) => {
            tracing::warn!("{error}");
            eprintln!("{ALREADY_RUNNING}");
            ExitCode::FAILURE
        }
        Err(error) => {
            tracing::error!("{error:#}");
            eprintln!("ERROR: {error:#}");
            ExitCode::FAILURE
        }
    }
}
