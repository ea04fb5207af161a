//! Terminal I/O seam between the run controller and the operator.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event},
    terminal::{disable_raw_mode, enable_raw_mode},
};

/// Operator-facing I/O used by the run controller.
///
/// The controller talks only to this trait, so tests can script a whole run
/// without a terminal.
pub trait Console {
    /// Print one line of output.
    fn say(&mut self, text: &str);

    /// Prompt for one line of input, returned trimmed. Blocks until a line
    /// is entered.
    fn prompt(&mut self) -> io::Result<String>;

    /// Give the operator time to read. May return early on a keypress.
    fn pause(&mut self, duration: Duration);
}

/// The real terminal: stdout prints, stdin prompts, and a reading pause
/// that any keypress can end early.
#[derive(Debug, Default)]
pub struct Terminal;

impl Console for Terminal {
    fn say(&mut self, text: &str) {
        println!("{text}");
    }

    fn prompt(&mut self) -> io::Result<String> {
        print!("\t~> ");
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn pause(&mut self, duration: Duration) {
        if wait_for_keypress(duration).is_err() {
            // not a tty; plain sleep
            std::thread::sleep(duration);
        }
    }
}

/// Block for up to `duration`, returning early when a key is pressed.
fn wait_for_keypress(duration: Duration) -> io::Result<()> {
    enable_raw_mode()?;

    let deadline = Instant::now() + duration;
    let result = loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break Ok(());
        }

        match event::poll(remaining) {
            Ok(true) => match event::read() {
                Ok(Event::Key(_)) => break Ok(()),
                Ok(_) => {}
                Err(e) => break Err(e),
            },
            Ok(false) => break Ok(()),
            Err(e) => break Err(e),
        }
    };

    disable_raw_mode()?;
    result
}
