//! Command execution through the host shell.
//!
//! This module runs one command string through `sh -c` or `cmd /C`, either
//! attached to the caller's terminal or with its output captured.

use crate::core::error::{Error, Result};
use crate::core::platform::Platform;
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::debug;

/// Output from a command execution.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code of the command, `None` if it was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Standard output (empty unless captured).
    pub stdout: String,
    /// Standard error (empty unless captured).
    pub stderr: String,
}

impl CommandOutput {
    /// Returns true if the command succeeded (exit code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// How one argument reaches the shell process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellArg {
    /// Quoted by the standard library for the host's argument conventions.
    Quoted(OsString),
    /// Appended to the Windows command line without further quoting.
    Verbatim(OsString),
}

/// A shell program and the flags that precede the command string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    program: String,
    flags: Vec<String>,
}

impl Shell {
    /// The platform's default shell: `sh -c` or `cmd /C`.
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        let (program, flag) = platform.shell();
        Self {
            program: program.to_string(),
            flags: vec![flag.to_string()],
        }
    }

    /// Builds a shell from an argument vector such as `["bash", "-c"]`.
    ///
    /// Returns `None` for an empty vector.
    #[must_use]
    pub fn from_argv<S: AsRef<str>>(argv: &[S]) -> Option<Self> {
        let (program, flags) = argv.split_first()?;
        Some(Self {
            program: program.as_ref().to_string(),
            flags: flags.iter().map(|f| f.as_ref().to_string()).collect(),
        })
    }

    /// The shell program.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Flags passed before the command string.
    #[must_use]
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// `cmd` strips one pair of quotes from its `/C` argument and cannot
    /// parse the backslash escapes the standard library would add.
    fn is_cmd(&self) -> bool {
        Path::new(&self.program)
            .file_stem()
            .is_some_and(|stem| stem.eq_ignore_ascii_case("cmd"))
    }

    /// The arguments handed to the shell program for `command`.
    #[must_use]
    pub fn args(&self, command: &OsStr) -> Vec<ShellArg> {
        let mut args: Vec<ShellArg> = self
            .flags
            .iter()
            .map(|flag| ShellArg::Quoted(flag.into()))
            .collect();

        if self.is_cmd() {
            let mut quoted = OsString::with_capacity(command.len() + 2);
            quoted.push("\"");
            quoted.push(command);
            quoted.push("\"");
            args.push(ShellArg::Verbatim(quoted));
        } else {
            args.push(ShellArg::Quoted(command.to_os_string()));
        }

        args
    }

    /// Builds the process for `command`, without configuring its streams.
    #[must_use]
    pub fn command(&self, command: &OsStr) -> Command {
        let mut cmd = Command::new(&self.program);
        for arg in self.args(command) {
            match arg {
                ShellArg::Quoted(arg) => {
                    cmd.arg(arg);
                },
                #[cfg(windows)]
                ShellArg::Verbatim(arg) => {
                    cmd.raw_arg(arg);
                },
                #[cfg(not(windows))]
                ShellArg::Verbatim(arg) => {
                    cmd.arg(arg);
                },
            }
        }
        cmd
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Whether to capture output (vs inheriting the caller's streams).
    pub capture_output: bool,
    /// Shell to use (default: sh on POSIX, cmd on Windows).
    pub shell: Option<Shell>,
}

impl ExecuteOptions {
    /// Sets whether to capture output.
    #[must_use]
    pub const fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    /// Sets the shell.
    #[must_use]
    pub fn shell(mut self, shell: Option<Shell>) -> Self {
        self.shell = shell;
        self
    }
}

/// Executor for running shell commands.
#[derive(Debug)]
pub struct Executor {
    platform: Platform,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    /// Creates an executor for the host platform.
    #[must_use]
    pub fn new() -> Self {
        Self {
            platform: Platform::current(),
        }
    }

    /// Executes a shell command and waits for it to finish.
    ///
    /// Fails only if the shell could not be spawned or waited on; a non-zero
    /// exit is reported through [`CommandOutput::exit_code`].
    pub async fn execute(
        &self,
        command: impl AsRef<OsStr>,
        options: ExecuteOptions,
    ) -> Result<CommandOutput> {
        let command = command.as_ref();
        let shell = options
            .shell
            .unwrap_or_else(|| Shell::for_platform(self.platform));

        let mut cmd = shell.command(command);

        if options.capture_output {
            cmd.stdin(Stdio::null());
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdin(Stdio::inherit());
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }

        debug!(
            shell = shell.program(),
            flags = ?shell.flags(),
            command = %command.to_string_lossy(),
            "spawning"
        );
        let mut child = cmd.spawn().map_err(|e| Error::io("spawn command", e))?;

        let (status, stdout, stderr) = self
            .wait_for_output(&mut child, options.capture_output)
            .await?;

        debug!(status = %status, "command finished");

        Ok(CommandOutput {
            exit_code: status.code(),
            stdout,
            stderr,
        })
    }

    /// Waits for the command to complete and captures output.
    async fn wait_for_output(
        &self,
        child: &mut tokio::process::Child,
        capture: bool,
    ) -> Result<(ExitStatus, String, String)> {
        if capture {
            let stdout = child.stdout.take();
            let stderr = child.stderr.take();

            let stdout_handle = tokio::spawn(async move {
                let mut buf = Vec::new();
                if let Some(mut stdout) = stdout {
                    stdout.read_to_end(&mut buf).await?;
                }
                Ok::<_, std::io::Error>(String::from_utf8_lossy(&buf).into_owned())
            });

            let stderr_handle = tokio::spawn(async move {
                let mut buf = Vec::new();
                if let Some(mut stderr) = stderr {
                    stderr.read_to_end(&mut buf).await?;
                }
                Ok::<_, std::io::Error>(String::from_utf8_lossy(&buf).into_owned())
            });

            let status = child.wait().await.map_err(|e| Error::io("wait for command", e))?;

            let stdout = stdout_handle
                .await
                .map_err(|e| Error::Internal {
                    message: format!("stdout task failed: {e}"),
                })?
                .map_err(|e| Error::io("read stdout", e))?;
            let stderr = stderr_handle
                .await
                .map_err(|e| Error::Internal {
                    message: format!("stderr task failed: {e}"),
                })?
                .map_err(|e| Error::io("read stderr", e))?;

            Ok((status, stdout, stderr))
        } else {
            let status = child.wait().await.map_err(|e| Error::io("wait for command", e))?;
            Ok((status, String::new(), String::new()))
        }
    }

    /// Resolves a program name on `PATH`.
    #[must_use]
    pub fn resolve(program: &str) -> Option<std::path::PathBuf> {
        which::which(program).ok()
    }
}
