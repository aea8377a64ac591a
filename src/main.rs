//! Main entry point for the `run-with-env` CLI.

use run_with_env::cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
