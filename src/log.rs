//! The append-only run log.
//!
//! The log file is both the persisted run state and the human-readable
//! audit trail. Entries are whole-entry appends, never rewritten; resume
//! only reads the header lines back.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RunbookResult;
use crate::step::Step;

static POSITIVE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^### ([A-Za-z].*)$").expect("valid regex"));

static NEGATIVE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^### ~~([A-Za-z].*)~~$").expect("valid regex"));

/// One record recovered from an existing log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Canonical step name from the header line.
    pub name: String,

    /// Whether the header was wrapped in the negation marker.
    pub negative: bool,
}

/// Handle on a run's log file.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a prior run left a log behind.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Parse the log top-to-bottom into `(name, negative)` records in file
    /// order. A missing file is a fresh run and yields an empty history;
    /// any other read failure is an error.
    ///
    /// Parsing is line-oriented: any line of the form `### <name>` counts
    /// as a header, including one inside a description fence.
    pub fn read(&self) -> RunbookResult<Vec<LogRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();

        for line in content.lines() {
            if let Some(caps) = NEGATIVE_HEADER.captures(line) {
                records.push(LogRecord { name: caps[1].to_string(), negative: true });
            } else if let Some(caps) = POSITIVE_HEADER.captures(line) {
                records.push(LogRecord { name: caps[1].to_string(), negative: false });
            }
        }

        tracing::debug!(path = ?self.path, records = records.len(), "Read run history");

        Ok(records)
    }

    /// Append one step outcome. The entry is composed in memory and
    /// written with a single call so an abrupt termination cannot leave a
    /// half-written entry behind.
    pub fn append(
        &self,
        step: &Step,
        response: &str,
        negative: bool,
        reason: Option<&str>,
    ) -> RunbookResult<()> {
        let entry = format_entry(step, response, negative, reason, Local::now());

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(entry.as_bytes())?;
        file.flush()?;

        tracing::debug!(step = step.name, negative, "Recorded step outcome");

        Ok(())
    }
}

/// Render one log entry.
///
/// Layout: a `###` header naming the step (wrapped in `~~` when negative),
/// the description fenced as a code block when non-empty, a response line
/// with the raw text and timestamp, and a reason block only for negative
/// responses that carry one.
#[must_use]
pub fn format_entry(
    step: &Step,
    response: &str,
    negative: bool,
    reason: Option<&str>,
    timestamp: DateTime<Local>,
) -> String {
    let mut entry = String::new();

    entry.push_str("### ");
    if negative {
        entry.push_str(&format!("~~{}~~", step.name));
    } else {
        entry.push_str(&step.name);
    }

    if step.description.is_empty() {
        entry.push('\n');
    } else {
        entry.push_str("\n```\n");
        entry.push_str(&step.description);
        entry.push_str("\n```\n");
    }

    entry.push_str(&format!(
        "responded `{}` at {} on {}\n",
        response,
        timestamp.format("%H:%M:%S"),
        timestamp.format("%d/%m/%Y"),
    ));

    if negative {
        if let Some(reason) = reason {
            entry.push_str(&format!("\nReason given:\n> {reason}\n"));
        }
    }

    entry.push_str("\n\n");
    entry
}
