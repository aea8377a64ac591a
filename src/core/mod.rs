//! Core functionality for run-with-env.
//!
//! This module contains the main components:
//! - [`dispatcher`]: Plans and runs the final command line
//! - [`allow_list`]: Tools that never need the environment
//! - [`platform`]: Windows vs POSIX activation and shell syntax
//! - [`project`]: Project root discovery
//! - [`executor`]: Host shell execution
//! - [`error`]: Error types and result handling

pub mod allow_list;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod platform;
pub mod project;
