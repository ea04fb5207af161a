//! # Runbook
//!
//! Define repeatable operational procedures in code and walk through them
//! interactively, one confirmed step at a time, with progress persisted so
//! an interrupted run resumes where it left off.
//!
//! A definition is an ordered list of registered step units:
//!
//! ```no_run
//! use runbook::{Runbook, StepUnit};
//!
//! let book = Runbook::new("DatabaseFailover")
//!     .step(StepUnit::new("verify_replica_lag").doc(
//!         "
//!         Check that the replica is under one second behind.
//!         ",
//!     ))
//!     .step(StepUnit::new("promote_the_replica").critical(true))
//!     .step(StepUnit::new("notify_the_channel").skippable(true));
//!
//! let _exit = book.main();
//! ```
//!
//! Every step outcome is appended to a human-readable log file; rerunning
//! against the same log skips steps that were already completed.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]

mod cli;
mod console;
mod definition;
mod error;
mod log;
mod response;
mod runner;
mod step;
pub mod template;

pub use cli::default_log_name;
pub use console::{Console, Terminal};
pub use definition::{Runbook, StepUnit};
pub use error::{RunbookError, RunbookResult};
pub use log::{format_entry, LogRecord, RunLog};
pub use response::{classify, Sentiment};
pub use runner::{Runner, RunnerState};
pub use step::Step;
