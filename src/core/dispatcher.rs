//! Environment-aware command dispatch.
//!
//! Dispatch happens in two steps. [`Dispatcher::plan`] decides the final
//! command line from the allow-list and the presence of the activation
//! script; nothing is executed yet. [`Dispatcher::execute`] then runs that
//! plan exactly once through the host shell.

use crate::config::Config;
use crate::core::allow_list::AllowList;
use crate::core::error::{Error, Result};
use crate::core::executor::{CommandOutput, ExecuteOptions, Executor, Shell};
use crate::core::platform::Platform;
use crate::core::project::Project;
use serde::Serialize;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The command line requested by the caller.
///
/// Arguments are kept as OS strings so that non-UTF-8 bytes reach the shell
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    command: OsString,
}

impl InvocationRequest {
    /// Joins argument tokens with single spaces.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = OsString::new();
        for (i, arg) in args.into_iter().enumerate() {
            if i > 0 {
                command.push(" ");
            }
            command.push(arg);
        }

        if command.to_string_lossy().trim().is_empty() {
            return Err(Error::EmptyCommand);
        }

        Ok(Self { command })
    }

    /// The joined command line.
    #[must_use]
    pub fn command(&self) -> &OsStr {
        &self.command
    }

    /// The joined command line as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn display(&self) -> String {
        self.command.to_string_lossy().into_owned()
    }

    /// The first whitespace-separated token of the command line.
    #[must_use]
    pub fn leading_token(&self) -> String {
        self.display()
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

/// Why the final command has the shape it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    /// The command starts with an allow-listed tool.
    AllowListed {
        /// The allow-list entry that matched.
        tool: String,
    },
    /// The activation script does not exist.
    NoEnvironment,
    /// The command runs after activating the environment.
    Wrapped,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllowListed { tool } => write!(f, "allow-listed tool: {tool}"),
            Self::NoEnvironment => write!(f, "no virtual environment found"),
            Self::Wrapped => write!(f, "activating virtual environment"),
        }
    }
}

/// A fully decided dispatch, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    /// The command line as requested.
    pub request: String,
    /// Platform the plan was made for.
    pub platform: Platform,
    /// Where the activation script was looked for.
    pub activation_script: PathBuf,
    /// Whether the activation script exists.
    pub env_present: bool,
    /// Why the final command looks the way it does.
    pub decision: Decision,
    /// The string handed to the shell, as text.
    pub command: String,
    /// The exact command line handed to the shell.
    #[serde(skip)]
    pub shell_command: OsString,
}

impl Plan {
    /// Returns true if the command is wrapped with environment activation.
    #[must_use]
    pub const fn is_wrapped(&self) -> bool {
        matches!(self.decision, Decision::Wrapped)
    }
}

/// Decides and runs the final command line.
#[derive(Debug)]
pub struct Dispatcher {
    allow_list: AllowList,
    env_dir: PathBuf,
    platform: Platform,
    shell: Option<Shell>,
}

impl Dispatcher {
    /// Creates a dispatcher for the host platform.
    #[must_use]
    pub fn new(allow_list: AllowList, env_dir: impl Into<PathBuf>) -> Self {
        Self {
            allow_list,
            env_dir: env_dir.into(),
            platform: Platform::current(),
            shell: None,
        }
    }

    /// Creates a dispatcher from configuration, resolving paths against the project root.
    #[must_use]
    pub fn from_config(config: &Config, project: &Project) -> Self {
        Self::new(config.allow_list(), project.env_dir(&config.environment.dir))
            .with_shell(config.shell())
    }

    /// Overrides the platform used for planning.
    #[must_use]
    pub const fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Overrides the shell used for execution.
    #[must_use]
    pub fn with_shell(mut self, shell: Option<Shell>) -> Self {
        self.shell = shell;
        self
    }

    /// Returns the environment directory.
    #[must_use]
    pub fn env_dir(&self) -> &Path {
        &self.env_dir
    }

    /// Returns the allow-list.
    #[must_use]
    pub const fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Path of the activation script for the configured platform.
    #[must_use]
    pub fn activation_script(&self) -> PathBuf {
        self.platform.activation_script(&self.env_dir)
    }

    /// Decides the final command, checking for the activation script now.
    #[must_use]
    pub fn plan(&self, request: &InvocationRequest) -> Plan {
        let env_present = self.activation_script().is_file();
        self.plan_with_presence(request, env_present)
    }

    /// Decides the final command for a known environment presence.
    #[must_use]
    pub fn plan_with_presence(&self, request: &InvocationRequest, env_present: bool) -> Plan {
        let activation_script = self.activation_script();

        let requested = request.display();
        let decision = if let Some(tool) = self.allow_list.matches(&requested) {
            Decision::AllowListed {
                tool: tool.to_string(),
            }
        } else if !env_present {
            Decision::NoEnvironment
        } else {
            Decision::Wrapped
        };

        let shell_command = match decision {
            Decision::Wrapped => self.platform.wrap(&activation_script, request.command()),
            Decision::AllowListed { .. } | Decision::NoEnvironment => {
                request.command().to_os_string()
            },
        };
        let command = shell_command.to_string_lossy().into_owned();

        debug!(
            platform = %self.platform,
            env_present,
            decision = %decision,
            command = %command,
            "planned command"
        );

        Plan {
            request: requested,
            platform: self.platform,
            activation_script,
            env_present,
            decision,
            command,
            shell_command,
        }
    }

    /// Runs a plan with inherited standard streams.
    ///
    /// Any non-zero exit, signal termination or launch failure becomes
    /// [`Error::CommandFailed`].
    pub async fn execute(&self, plan: &Plan, executor: &Executor) -> Result<()> {
        self.execute_with(plan, executor, ExecuteOptions::default()).await?;
        Ok(())
    }

    /// Runs a plan with explicit execution options.
    pub async fn execute_with(
        &self,
        plan: &Plan,
        executor: &Executor,
        options: ExecuteOptions,
    ) -> Result<CommandOutput> {
        let shell = self.shell.clone().or_else(|| options.shell.clone());
        let wrapped = plan.is_wrapped();

        let result = executor
            .execute(&plan.shell_command, options.shell(shell))
            .await;
        match result {
            Ok(output) if output.success() => Ok(output),
            Ok(output) => Err(Error::command_failed(
                plan.command.clone(),
                wrapped,
                output.exit_code,
            )),
            Err(e) => {
                warn!(error = %e, "command could not be launched");
                Err(Error::command_failed(plan.command.clone(), wrapped, None))
            },
        }
    }
}
