//! Error types for run-with-env.
//!
//! This module defines all errors that can occur during operation.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in run-with-env.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // =========================================================================
    // Configuration errors
    // =========================================================================
    /// Configuration file not found.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path where config was expected.
        path: PathBuf,
    },

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        /// Description of the parse error.
        message: String,
        /// Underlying parser error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {field} - {message}")]
    ConfigInvalid {
        /// Field name that is invalid.
        field: String,
        /// Description of why it's invalid.
        message: String,
    },

    // =========================================================================
    // Dispatch errors
    // =========================================================================
    /// No command was given to run.
    #[error("No command given")]
    EmptyCommand,

    /// The child command exited non-zero or could not be launched.
    #[error("Failed to run the command{}: {command}", wrapping_context(.wrapped))]
    CommandFailed {
        /// The exact command string handed to the shell.
        command: String,
        /// Whether the command was wrapped with environment activation.
        wrapped: bool,
        /// Exit code of the child, `None` if it never started or was killed.
        exit_code: Option<i32>,
    },

    // =========================================================================
    // I/O errors
    // =========================================================================
    /// File I/O error.
    #[error("I/O error: {message}")]
    Io {
        /// Description of what failed.
        message: String,
        /// Source error.
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Internal errors
    // =========================================================================
    /// Internal error (should never happen).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

fn wrapping_context(wrapped: &bool) -> &'static str {
    if *wrapped {
        " inside the virtual environment"
    } else {
        ""
    }
}

impl Error {
    /// Creates a new configuration parse error.
    pub fn config_parse(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Creates a new invalid configuration error.
    pub fn config_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a new I/O error with context.
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Creates a new command failed error.
    pub fn command_failed(command: impl Into<String>, wrapped: bool, exit_code: Option<i32>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            wrapped,
            exit_code,
        }
    }

    /// Returns true if this is a user-correctable error.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. } | Self::ConfigInvalid { .. } | Self::EmptyCommand
        )
    }

    /// Returns an exit code appropriate for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::EmptyCommand => 64, // EX_USAGE
            Self::ConfigNotFound { .. } | Self::ConfigParse { .. } | Self::ConfigInvalid { .. } => {
                78
            }, // EX_CONFIG
            Self::CommandFailed { .. } | Self::Io { .. } | Self::Internal { .. } => 1,
        }
    }
}
