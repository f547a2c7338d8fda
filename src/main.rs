//! Pipeline Anomaly Detector - Main Entry Point
//!
//! Loads historical CI/CD metrics, scores them with an ensemble of anomaly
//! detectors, persists the results and reports through stdout and the exit
//! status.

mod api;
mod logic;
pub mod constants;

use std::process::ExitCode;

use clap::Parser;

use api::{Cli, CliExitCode};

fn main() -> ExitCode {
    // .env must be loaded before flag defaults are read
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help / --version are not failures
            let code = if e.use_stderr() { CliExitCode::Failure } else { CliExitCode::NoAnomaly };
            let _ = e.print();
            return code.into();
        }
    };

    let default_level = if cli.verbose > 0 { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    log::info!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);

    match api::execute(&cli) {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("Error during anomaly detection: {:#}", e);
            CliExitCode::Failure.into()
        }
    }
}
