//! CLI command implementations.

use super::OutputFormat;
use crate::config::Config;
use crate::core::dispatcher::{Decision, Dispatcher, InvocationRequest, Plan};
use crate::core::error::{Error, Result};
use crate::core::executor::Executor;
use crate::core::project::Project;
use crate::tools;
use console::style;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

/// Project, configuration and dispatcher resolved for one invocation.
#[derive(Debug)]
pub struct Context {
    project: Project,
    config_file: Option<PathBuf>,
    config: Config,
    dispatcher: Dispatcher,
}

impl Context {
    /// Resolves the project root, loads configuration and builds the dispatcher.
    pub fn resolve(
        root: Option<&Path>,
        config_path: Option<&Path>,
        env_dir: Option<&str>,
    ) -> Result<Self> {
        let project = match root {
            Some(root) => Project::at(root),
            None => Project::discover()?,
        };

        let config_file = config_path
            .or_else(|| project.config_file())
            .map(Path::to_path_buf);
        let mut config = Config::load_or_default(config_file.as_deref())?;
        if let Some(dir) = env_dir {
            config.environment.dir = dir.to_string();
            config.validate()?;
        }

        debug!(
            root = %project.root().display(),
            config = ?config_file,
            "resolved project"
        );

        let dispatcher = Dispatcher::from_config(&config, &project);
        Ok(Self {
            project,
            config_file,
            config,
            dispatcher,
        })
    }
}

/// Plans and runs the command.
pub fn run(context: &Context, args: &[OsString]) -> Result<ExitCode> {
    let request = InvocationRequest::from_args(args)?;
    let plan = context.dispatcher.plan(&request);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Internal {
            message: format!("Failed to create runtime: {e}"),
        })?;

    let executor = Executor::new();
    runtime.block_on(context.dispatcher.execute(&plan, &executor))?;

    Ok(ExitCode::SUCCESS)
}

/// Prints the plan without running it.
pub fn dry_run(context: &Context, args: &[OsString], format: OutputFormat) -> Result<ExitCode> {
    let request = InvocationRequest::from_args(args)?;
    let plan = context.dispatcher.plan(&request);

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&plan).map_err(|e| Error::Internal {
                message: format!("Failed to serialize plan: {e}"),
            })?;
            writeln!(std::io::stdout(), "{json}").map_err(|e| Error::io("write output", e))?;
        },
        OutputFormat::Text => print_plan(context, &request, &plan),
    }

    Ok(ExitCode::SUCCESS)
}

/// Prints a plan for humans.
fn print_plan(context: &Context, request: &InvocationRequest, plan: &Plan) {
    eprintln!("Project root: {}", context.project.root().display());
    eprintln!(
        "Activation script: {} ({})",
        plan.activation_script.display(),
        if plan.env_present {
            style("found").green()
        } else {
            style("missing").yellow()
        }
    );
    eprintln!("Platform: {}", plan.platform);

    let decision = match &plan.decision {
        Decision::AllowListed { tool } if tools::is_builtin(tool) => {
            format!("{} (built-in)", plan.decision)
        },
        other => other.to_string(),
    };
    eprintln!("Decision: {}", style(decision).bold());

    let token = request.leading_token();
    match Executor::resolve(&token) {
        Some(path) => eprintln!("Tool: {token} -> {}", path.display()),
        None => eprintln!("Tool: {token} -> {}", style("not on PATH").dim()),
    }

    eprintln!();
    println!("{}", plan.command);
}

/// Prints the effective configuration.
pub fn show_config(context: &Context) -> Result<ExitCode> {
    match &context.config_file {
        Some(path) => eprintln!("Configuration file: {}", path.display()),
        None => eprintln!("{} No configuration file found, using defaults", style("•").cyan()),
    }

    let toml = context.config.to_toml()?;
    std::io::stdout()
        .write_all(toml.as_bytes())
        .map_err(|e| Error::io("write output", e))?;

    Ok(ExitCode::SUCCESS)
}

/// Generate shell completions.
pub fn completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    clap_complete::generate(
        shell,
        &mut super::Cli::command(),
        "run-with-env",
        &mut std::io::stdout(),
    );
}
