//! Host platform identification.
//!
//! The platform decides where the activation script lives inside the
//! environment directory, how it is chained in front of a command, and which
//! shell runs the result.

use serde::Serialize;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// The two platform families the dispatcher distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Windows-like: `Scripts\activate`, run through `cmd /C`.
    Windows,
    /// POSIX-like: `bin/activate`, sourced and run through `sh -c`.
    Posix,
}

impl Platform {
    /// Identifies the platform the process is running on.
    ///
    /// Evaluated on every call; nothing is cached.
    #[must_use]
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Maps an operating system identifier (as in `std::env::consts::OS`).
    #[must_use]
    pub fn from_os(os: &str) -> Self {
        if os.eq_ignore_ascii_case("windows") {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// Returns a human-readable name for the platform.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Posix => "posix",
        }
    }

    /// Path of the activation script inside an environment directory.
    #[must_use]
    pub fn activation_script(&self, env_dir: &Path) -> PathBuf {
        match self {
            Self::Windows => env_dir.join("Scripts").join("activate"),
            Self::Posix => env_dir.join("bin").join("activate"),
        }
    }

    /// Chains environment activation in front of `command`.
    ///
    /// Both the script path and the command are kept byte for byte.
    #[must_use]
    pub fn wrap(&self, activation_script: &Path, command: &OsStr) -> OsString {
        let mut wrapped = OsString::new();
        if *self == Self::Posix {
            wrapped.push(". ");
        }
        wrapped.push("\"");
        wrapped.push(activation_script);
        wrapped.push("\" && ");
        wrapped.push(command);
        wrapped
    }

    /// Default shell program and the flag that makes it run one command string.
    #[must_use]
    pub const fn shell(&self) -> (&'static str, &'static str) {
        match self {
            Self::Windows => ("cmd", "/C"),
            Self::Posix => ("sh", "-c"),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
