//! Command-line interface for run-with-env.
//!
//! `run-with-env [OPTIONS] <COMMAND>...` joins everything from the first
//! positional argument onwards into one command line and runs it, inside the
//! project's virtual environment unless the tool is allow-listed or the
//! environment is missing.

mod commands;

use crate::core::error::{Error, Result};
use clap::Parser;
use console::style;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Run a command inside the project's virtual environment when it needs one.
#[derive(Debug, Parser)]
#[command(
    name = "run-with-env",
    author,
    version,
    about = "Run a command inside the project's virtual environment when it needs one",
    long_about = r#"
run-with-env runs a shell command through the host shell. If the command does
not start with an allow-listed tool and the project has a virtual environment
at env/bin/activate (env\Scripts\activate on Windows), the environment is
activated first.

Examples:
  run-with-env pytest -x          # . "env/bin/activate" && pytest -x
  run-with-env eslint .           # eslint . (allow-listed)
  run-with-env --dry-run pytest   # show the decision without running

Configuration is read from run-with-env.toml in the project root.
"#
)]
pub struct Cli {
    /// Command to run, with its arguments.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required_unless_present_any = ["completions", "show_config"]
    )]
    pub command: Vec<OsString>,

    /// Project root (default: nearest directory with run-with-env.toml or .git).
    #[arg(short = 'C', long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Configuration file (default: run-with-env.toml in the project root).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Virtual environment directory, overriding the configuration.
    #[arg(long, value_name = "DIR")]
    pub env_dir: Option<String>,

    /// Print the decision instead of running the command.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Output format for --dry-run [default: text].
    #[arg(long, value_enum, requires = "dry_run")]
    pub format: Option<OutputFormat>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long, conflicts_with = "completions")]
    pub show_config: bool,

    /// Generate shell completions and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Use color output.
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Always use color.
    Always,
    /// Auto-detect color support.
    #[default]
    Auto,
    /// Never use color.
    Never,
}

/// Plan output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// JSON object.
    Json,
}

/// Runs the CLI.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);
    setup_color(cli.color);

    match dispatch(&cli) {
        Ok(code) => code,
        Err(e) => {
            report(&e);
            ExitCode::from(e.exit_code())
        },
    }
}

fn dispatch(cli: &Cli) -> Result<ExitCode> {
    if let Some(shell) = cli.completions {
        commands::completions(shell);
        return Ok(ExitCode::SUCCESS);
    }

    let context = commands::Context::resolve(
        cli.root.as_deref(),
        cli.config.as_deref(),
        cli.env_dir.as_deref(),
    )?;

    if cli.show_config {
        return commands::show_config(&context);
    }

    if cli.dry_run {
        commands::dry_run(&context, &cli.command, cli.format.unwrap_or_default())
    } else {
        commands::run(&context, &cli.command)
    }
}

/// Prints an error to stderr.
fn report(error: &Error) {
    match error {
        Error::CommandFailed {
            command, wrapped, ..
        } => {
            let what = if *wrapped {
                "Failed to run the command inside the virtual environment."
            } else {
                "Failed to run the command."
            };
            eprintln!("{} {what}", style("✗").red().bold());
            eprintln!("  Command: {command}");
        },
        other => {
            eprintln!("{} {other}", style("Error:").red().bold());
            let mut source = std::error::Error::source(other);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            if other.is_user_error() {
                eprintln!(
                    "  {} see `run-with-env --help` and `run-with-env --show-config`",
                    style("hint:").cyan()
                );
            }
        },
    }
}

/// Sets up logging based on verbosity flags.
fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Sets up color output.
fn setup_color(choice: ColorChoice) {
    match choice {
        ColorChoice::Always => {
            console::set_colors_enabled(true);
            console::set_colors_enabled_stderr(true);
        },
        ColorChoice::Never => {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        },
        ColorChoice::Auto => {
            // Let console crate auto-detect
        },
    }
}
