//! Project root discovery.
//!
//! The project root anchors the environment directory and the configuration
//! file. It is found by walking up from a starting directory to the nearest
//! directory that holds either a `run-with-env.toml` or a `.git` entry.
//! Discovery only inspects the filesystem; it never runs anything.

use crate::config::CONFIG_FILE_NAME;
use crate::core::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Marker that identifies a repository root when no config file is present.
const REPO_MARKER: &str = ".git";

/// A resolved project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Directory the environment path is resolved against.
    root: PathBuf,
    /// Configuration file found in the root, if any.
    config_file: Option<PathBuf>,
}

impl Project {
    /// Discovers the project from the current directory.
    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| Error::io("get current dir", e))?;
        Ok(Self::discover_from(&cwd))
    }

    /// Discovers the project from a specific path.
    ///
    /// Falls back to `start` itself when no marker is found on the way up.
    #[must_use]
    pub fn discover_from(start: &Path) -> Self {
        let mut current = start;
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Self {
                    root: current.to_path_buf(),
                    config_file: Some(config_path),
                };
            }
            if current.join(REPO_MARKER).exists() {
                return Self::at(current);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Self::at(start)
    }

    /// Uses `root` as the project root without searching.
    #[must_use]
    pub fn at(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE_NAME);
        Self {
            root: root.to_path_buf(),
            config_file: config_path.is_file().then_some(config_path),
        }
    }

    /// Returns the root directory of the project.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the configuration file in the root, if one exists.
    #[must_use]
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Resolves the environment directory against the root.
    ///
    /// Absolute paths are returned unchanged.
    #[must_use]
    pub fn env_dir(&self, dir: &str) -> PathBuf {
        let path = Path::new(dir);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
