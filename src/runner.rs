//! Runbook execution engine.
//!
//! Walks the extracted steps in order, presents each one, collects and
//! classifies the operator's response, applies the skip/critical/repeatable
//! policy, and appends outcomes to the run log. An existing log file is
//! loaded first so an interrupted run resumes where it left off.

use std::path::PathBuf;
use std::time::Duration;

use crate::console::{Console, Terminal};
use crate::definition::{dedent, Runbook};
use crate::error::{RunbookError, RunbookResult};
use crate::log::RunLog;
use crate::response::{classify, Sentiment};
use crate::step::Step;

const PAUSE_PER_CHAR: u64 = 75;
const PAUSE_FLOOR: Duration = Duration::from_millis(1050);
const PAUSE_CAP: Duration = Duration::from_secs(10);

/// Runner state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerState {
    Ready,
    Running,
    Completed,
}

/// Drives one run of a definition against a log file.
#[derive(Debug)]
pub struct Runner<C: Console = Terminal> {
    /// Extracted steps, in execution order
    steps: Vec<Step>,

    /// Preamble text shown at run start
    preamble: Option<String>,

    /// The append-only run log
    log: RunLog,

    /// Operator I/O
    console: C,

    /// Runner state
    state: RunnerState,
}

impl Runner<Terminal> {
    /// Create a runner on the real terminal.
    ///
    /// Extraction happens here, so a definition with an illegal flag
    /// combination fails before any I/O or prompting.
    pub fn new(definition: &Runbook, log_path: impl Into<PathBuf>) -> RunbookResult<Self> {
        Self::with_console(definition, log_path, Terminal)
    }
}

impl<C: Console> Runner<C> {
    /// Create a runner with a custom console.
    pub fn with_console(
        definition: &Runbook,
        log_path: impl Into<PathBuf>,
        console: C,
    ) -> RunbookResult<Self> {
        let log_path = log_path.into();
        if log_path.as_os_str().is_empty() {
            return Err(RunbookError::MissingPath);
        }

        let steps = definition.steps()?;

        Ok(Self {
            steps,
            preamble: definition.preamble.clone(),
            log: RunLog::new(log_path),
            console,
            state: RunnerState::Ready,
        })
    }

    /// Get the current state.
    #[must_use]
    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    /// Access the console (test hook).
    #[must_use]
    pub fn console(&self) -> &C {
        &self.console
    }

    /// Walk every step, resuming against any prior history.
    pub fn run(&mut self) -> RunbookResult<()> {
        self.state = RunnerState::Running;

        let resumed = self.log.exists();
        let history = if resumed {
            self.console.say("");
            self.console.say("(reading existing file...)");
            self.log.read()?
        } else {
            Vec::new()
        };

        tracing::debug!(
            steps = self.steps.len(),
            history = history.len(),
            resumed,
            "Starting run"
        );

        if let Some(preamble) = &self.preamble {
            self.console.say("");
            self.console.say(dedent(preamble).trim());
        }

        let mut cursor = 0;
        let mut answered_any = false;
        let mut resume_notice_shown = false;
        let steps = self.steps.clone();

        for step in &steps {
            self.console.say("");

            // align against prior history, positionally by name
            if let Some(record) = history.get(cursor) {
                if record.name == step.name {
                    cursor += 1;

                    if step.repeatable {
                        self.console.say(&format!("(repeating step '{}')", step.name));
                        self.console.say("");
                    } else {
                        self.console
                            .say(&format!("(skipping already completed step '{}')", step.name));
                        continue;
                    }
                } else {
                    self.console.say(&format!("(found new step '{}')", step.name));
                    self.console.say("");
                }
            } else if resumed && !resume_notice_shown {
                self.console.say(&format!("(resuming from step '{}')", step.name));
                self.console.say("");
                resume_notice_shown = true;
            }

            self.present(step);

            // resumed runs get one grace skip before any response lands
            let in_grace = resumed && !answered_any;
            self.answer(step, in_grace)?;
            answered_any = true;
        }

        self.state = RunnerState::Completed;

        self.console.say("");
        self.console.say("(all steps completed)");

        Ok(())
    }

    /// Print the step and pause long enough to read it.
    fn present(&mut self, step: &Step) {
        tracing::debug!(step = step.name, "Presenting step");

        self.console.say(step.preferred_name());
        self.console.say("");

        if step.description.is_empty() {
            self.console.say(&step.name);
        } else {
            self.console.say(&step.description);
        }
        self.console.say("");

        self.console.pause(reading_pause(step.description.len()));
    }

    /// Prompt until the step's policy lets the run advance, then record
    /// exactly one log entry for it.
    fn answer(&mut self, step: &Step, in_grace: bool) -> RunbookResult<()> {
        self.console.say("\tDid you do the thing?");

        loop {
            let raw = self.console.prompt()?;

            match classify(&raw) {
                Sentiment::Affirmative => {
                    self.log.append(step, &raw, false, None)?;
                    return Ok(());
                }
                Sentiment::Negative => {
                    if step.skippable || in_grace {
                        self.log.append(step, &raw, true, Some("skipped"))?;
                        return Ok(());
                    }

                    if step.critical {
                        self.console.say("\n\tthis step cannot be skipped\n");
                        continue;
                    }

                    self.console.say("\n\tWhy not?");
                    let reason = self.console.prompt()?;
                    self.log.append(step, &raw, true, Some(&reason))?;
                    return Ok(());
                }
                Sentiment::Invalid => {
                    self.console.say("\n\tinvalid response\n");
                }
            }
        }
    }
}

/// Pause duration for a description of `len` characters: 75 ms per
/// character, floored so even empty steps pause briefly, capped so long
/// descriptions do not stall the operator.
fn reading_pause(len: usize) -> Duration {
    Duration::from_millis(len as u64 * PAUSE_PER_CHAR).clamp(PAUSE_FLOOR, PAUSE_CAP)
}
