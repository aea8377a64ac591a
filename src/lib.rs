//! # run-with-env
//!
//! Run a command inside the project's virtual environment, unless it doesn't
//! need one.
//!
//! A command runs through the host shell unmodified when its leading token is
//! on the allow-list (package managers, linters, formatters) or when the
//! project has no virtual environment. Otherwise the environment's activation
//! script is chained in front of it: `. "env/bin/activate" && <command>` on
//! POSIX, `"env\Scripts\activate" && <command>` on Windows.
//!
//! ## Example
//!
//! ```rust,no_run
//! use run_with_env::{AllowList, Dispatcher, Executor, InvocationRequest};
//!
//! fn main() -> run_with_env::Result<()> {
//!     let dispatcher = Dispatcher::new(AllowList::default(), "env");
//!     let request = InvocationRequest::from_args(["pytest", "-x"])?;
//!
//!     // Decide fully first...
//!     let plan = dispatcher.plan(&request);
//!     println!("{}", plan.command);
//!
//!     // ...then execute once.
//!     let runtime = tokio::runtime::Builder::new_current_thread()
//!         .enable_all()
//!         .build()
//!         .expect("runtime");
//!     runtime.block_on(dispatcher.execute(&plan, &Executor::new()))
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/run-with-env/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cli;
pub mod config;
pub mod core;
pub mod tools;

// Re-export main types for convenience
pub use config::Config;
pub use core::allow_list::AllowList;
pub use core::dispatcher::{Decision, Dispatcher, InvocationRequest, Plan};
pub use core::error::{Error, Result};
pub use core::executor::{Executor, Shell};
pub use core::platform::Platform;
pub use core::project::Project;
