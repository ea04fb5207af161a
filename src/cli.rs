//! Entry-point glue for author-written runbook binaries.
//!
//! A definition becomes a program by calling [`Runbook::main`] from `main`:
//! argv handling, the default log path, signal handling, and logging setup
//! all live here so the definition file stays declarative.

use std::process::ExitCode;

use clap::Parser;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::definition::Runbook;
use crate::runner::Runner;

static CAPITALS: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z])").expect("valid regex"));

/// Command-line surface of a runbook binary.
#[derive(Debug, Parser)]
#[command(about = "Walk through this runbook interactively")]
struct RunArgs {
    /// Log file to record progress in (defaults to a name derived from
    /// the runbook's name)
    filename: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Runbook {
    /// Run this definition as a command-line program.
    ///
    /// Accepts one optional positional argument naming the log file; more
    /// than one is a usage error with non-zero exit. Errors are printed to
    /// stderr and map to a failing exit code.
    pub fn main(self) -> ExitCode {
        let args = RunArgs::parse();

        let filter = if args.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(filter)
            .try_init();

        // leave the terminal on a clean line when interrupted mid-prompt
        let _ = ctrlc::set_handler(|| {
            std::thread::sleep(std::time::Duration::from_millis(150));
            println!();
            std::process::exit(0);
        });

        match self.launch(args.filename) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        }
    }

    fn launch(self, filename: Option<String>) -> anyhow::Result<()> {
        let file_name = filename.unwrap_or_else(|| default_log_name(self.name()));
        let path = std::env::current_dir()?.join(file_name);

        tracing::debug!(path = ?path, "Opening run log");

        Runner::new(&self, path)?.run()?;
        Ok(())
    }
}

/// Derive the default log file name from a definition name: an underscore
/// before each capital, lowercased, `.log` appended.
///
/// `CustomRunbook` becomes `custom_runbook.log`; a leading capital does not
/// produce a leading underscore (`ACustomClass` -> `a_custom_class.log`).
#[must_use]
pub fn default_log_name(name: &str) -> String {
    let snake = CAPITALS.replace_all(name, "_$1").to_lowercase();
    format!("{}.log", snake.trim_start_matches('_'))
}
