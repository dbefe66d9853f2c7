//! Binary crate for the `weatherapp` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging setup
//! - The terminal side of interactive configuration
//! - Human-friendly output formatting

use clap::Parser;
use std::process::ExitCode;
use weatherapp_core::Settings;

mod cli;
mod logging;
mod output;
mod prompt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cmd = cli::Cli::parse();
    let debug = cmd.debug;
    let settings = match Settings::from_home() {
        Ok(settings) => settings,
        Err(err) => {
            report(&err.into(), debug);
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = logging::init(cmd.verbose, &settings.log_file);

    tokio::select! {
        result = cmd.run(settings) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                report(&err, debug);
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted. Please restart the program.");
            ExitCode::from(130)
        }
    }
}

/// One line by default, the whole error chain with `--debug`.
fn report(err: &anyhow::Error, debug: bool) {
    if debug {
        tracing::error!(error = ?err, "Operation failed");
        eprintln!("Operation failed: {err:?}");
    } else {
        eprintln!("Operation failed: {err:#}");
    }
}
