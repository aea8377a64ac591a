//! Configuration handling for run-with-env.
//!
//! This module provides configuration loading and validation, supporting an
//! optional `run-with-env.toml` file in the project root and sensible
//! defaults when there is none.

use crate::core::allow_list::AllowList;
use crate::core::error::{Error, Result};
use crate::core::executor::Shell;
use crate::tools;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "run-with-env.toml";

/// Default environment directory, relative to the project root.
pub const DEFAULT_ENV_DIR: &str = "env";

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Virtual environment location.
    pub environment: EnvironmentConfig,
    /// Tools that never need the environment.
    pub allow_list: AllowListConfig,
    /// How the final command is executed.
    pub execution: ExecutionConfig,
}

impl Config {
    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::io("read config", e))?;
        Self::parse(&content)
    }

    /// Loads configuration from `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load_from)
    }

    /// Parses and validates configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::config_parse("Failed to parse TOML", e))?;

        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.environment.dir.trim().is_empty() {
            return Err(Error::config_invalid(
                "environment.dir",
                "must not be empty",
            ));
        }

        for (field, entries) in [
            ("allow_list.tools", &self.allow_list.tools),
            ("allow_list.extra", &self.allow_list.extra),
        ] {
            if let Some(index) = entries.iter().position(|t| t.trim().is_empty()) {
                return Err(Error::config_invalid(
                    format!("{field}[{index}]"),
                    "tool name must not be empty",
                ));
            }
        }

        if let Some(shell) = &self.execution.shell {
            if shell.is_empty() {
                return Err(Error::config_invalid(
                    "execution.shell",
                    "must name a program when set",
                ));
            }
            if let Some(index) = shell.iter().position(|arg| arg.trim().is_empty()) {
                return Err(Error::config_invalid(
                    format!("execution.shell[{index}]"),
                    "argument must not be empty",
                ));
            }
        }

        Ok(())
    }

    /// Builds the allow-list: `tools` followed by `extra`.
    #[must_use]
    pub fn allow_list(&self) -> AllowList {
        let mut list = AllowList::new(self.allow_list.tools.iter().cloned());
        list.extend(self.allow_list.extra.iter().cloned());
        list
    }

    /// Builds the configured shell, if any.
    #[must_use]
    pub fn shell(&self) -> Option<Shell> {
        self.execution.shell.as_deref().and_then(Shell::from_argv)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Internal {
            message: format!("Failed to serialize config: {e}"),
        })
    }
}

/// Virtual environment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Environment directory, relative to the project root or absolute.
    pub dir: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_ENV_DIR.to_string(),
        }
    }
}

/// Allow-list configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowListConfig {
    /// Tool names, replacing the built-in list when set.
    pub tools: Vec<String>,
    /// Tool names appended after `tools`.
    pub extra: Vec<String>,
}

impl Default for AllowListConfig {
    fn default() -> Self {
        Self {
            tools: tools::defaults().iter().map(|t| (*t).to_string()).collect(),
            extra: Vec::new(),
        }
    }
}

/// Execution configuration.
///
/// The command line keeps the platform's activation syntax whatever the
/// shell: `. "<script>" && <cmd>` on POSIX and `"<script>" && <cmd>` on
/// Windows. A replacement shell must understand it (`bash`, `zsh` and `dash`
/// do; `fish` and `nu` do not).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Shell program and the flags before the command string, replacing
    /// `["sh", "-c"]` (POSIX) or `["cmd", "/C"]` (Windows).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<Vec<String>>,
}
