//! Runbook definitions and step extraction.
//!
//! A [`Runbook`] is an ordered collection of registered [`StepUnit`]s.
//! Registration order is execution order; composing definitions with
//! [`Runbook::extending`] places the parent's steps before the child's.

use std::fmt;

use crate::error::{RunbookError, RunbookResult};
use crate::step::Step;

/// Identifiers reserved for control flow; never produce steps.
const RESERVED_NAMES: [&str; 2] = ["run", "main"];

type DescribeFn = Box<dyn Fn() -> Option<String>>;

/// One registered step-producing unit.
///
/// The canonical step name is the identifier with underscores replaced by
/// spaces. The description is resolved at extraction time: the describe
/// closure's value wins, then the attached doc text, then empty.
pub struct StepUnit {
    id: String,
    doc: Option<String>,
    describe: Option<DescribeFn>,
    display_name: Option<String>,
    skippable: bool,
    repeatable: bool,
    critical: bool,
}

impl StepUnit {
    /// Register a unit under `id`. Identifiers that do not start with an
    /// ASCII letter, or that collide with a reserved name, are excluded
    /// from extraction.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            doc: None,
            describe: None,
            display_name: None,
            skippable: false,
            repeatable: false,
            critical: false,
        }
    }

    /// Attach doc text, used as the description when the unit has no
    /// describe closure (or the closure returns `None`). Dedented and
    /// trimmed at extraction.
    pub fn doc(mut self, text: impl Into<String>) -> Self {
        self.doc = Some(text.into());
        self
    }

    /// Attach a description-producing closure, invoked exactly once per
    /// extraction. Returning `None` falls back to the doc text.
    pub fn describe<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Option<String> + 'static,
    {
        self.describe = Some(Box::new(f));
        self
    }

    /// Alternative title for display; resume matching still uses the
    /// canonical name.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// A negative answer skips this step without asking for a reason.
    pub fn skippable(mut self, value: bool) -> Self {
        self.skippable = value;
        self
    }

    /// Present this step again on resume even when already recorded.
    pub fn repeatable(mut self, value: bool) -> Self {
        self.repeatable = value;
        self
    }

    /// This step cannot be declined; negative answers are re-prompted.
    pub fn critical(mut self, value: bool) -> Self {
        self.critical = value;
        self
    }
}

impl fmt::Debug for StepUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepUnit")
            .field("id", &self.id)
            .field("doc", &self.doc)
            .field("display_name", &self.display_name)
            .field("skippable", &self.skippable)
            .field("repeatable", &self.repeatable)
            .field("critical", &self.critical)
            .finish()
    }
}

/// A runbook definition: a named, ordered set of step units with an
/// optional preamble shown before each run.
pub struct Runbook {
    pub(crate) name: String,
    pub(crate) preamble: Option<String>,
    pub(crate) units: Vec<StepUnit>,
}

impl Runbook {
    /// Create an empty definition. The name is the procedure's type-style
    /// name (e.g. `DatabaseFailover`); the default log file name is
    /// derived from it.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), preamble: None, units: Vec::new() }
    }

    /// Set the preamble text, printed (dedented) at the start of each run.
    pub fn preamble(mut self, text: impl Into<String>) -> Self {
        self.preamble = Some(text.into());
        self
    }

    /// Register the next step unit.
    pub fn step(mut self, unit: StepUnit) -> Self {
        self.units.push(unit);
        self
    }

    /// Compose with a parent definition: the parent's steps run before any
    /// of this definition's steps, and its preamble is inherited when this
    /// definition has none.
    pub fn extending(mut self, parent: Runbook) -> Self {
        let mut units = parent.units;
        units.append(&mut self.units);
        self.units = units;

        if self.preamble.is_none() {
            self.preamble = parent.preamble;
        }

        self
    }

    /// The definition's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extract the ordered steps, invoking each unit's describe closure
    /// exactly once. Fails with [`RunbookError::Configuration`] when a
    /// unit is both skippable and critical, before any step is presented.
    pub fn steps(&self) -> RunbookResult<Vec<Step>> {
        let mut steps = Vec::with_capacity(self.units.len());

        for unit in &self.units {
            if !unit.id.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
                continue;
            }

            if RESERVED_NAMES.contains(&unit.id.as_str()) {
                continue;
            }

            if unit.skippable && unit.critical {
                return Err(RunbookError::Configuration(format!(
                    "step '{}' cannot be both skippable and critical",
                    unit.id
                )));
            }

            let description = match unit.describe.as_ref().and_then(|f| f()) {
                Some(value) => dedent(&value).trim().to_string(),
                None => unit.doc.as_deref().map(|d| dedent(d).trim().to_string()).unwrap_or_default(),
            };

            steps.push(Step {
                name: unit.id.replace('_', " "),
                description,
                display_name: unit.display_name.clone(),
                skippable: unit.skippable,
                repeatable: unit.repeatable,
                critical: unit.critical,
            });
        }

        tracing::debug!(runbook = self.name, count = steps.len(), "Extracted steps");

        Ok(steps)
    }
}

impl fmt::Debug for Runbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runbook")
            .field("name", &self.name)
            .field("preamble", &self.preamble)
            .field("units", &self.units)
            .finish()
    }
}

/// Strip the longest common leading whitespace prefix from every non-blank
/// line. Lines indented with different whitespace characters (tabs vs
/// spaces) share no prefix and are left untouched.
pub(crate) fn dedent(text: &str) -> String {
    let mut prefix: Option<&str> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let indent = &line[..line.len() - line.trim_start().len()];
        prefix = Some(match prefix {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }

    let prefix = prefix.unwrap_or("");

    let mut out = String::with_capacity(text.len());
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if line.trim().is_empty() {
            continue;
        }
        out.push_str(line.strip_prefix(prefix).unwrap_or(line));
    }
    out
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let mut end = 0;
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            break;
        }
        end += ca.len_utf8();
    }
    &a[..end]
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_steps_preserve_registration_order() {
        let book = Runbook::new("Test")
            .step(StepUnit::new("first_step"))
            .step(StepUnit::new("second_step"))
            .step(StepUnit::new("third_step"));

        let steps = book.steps().unwrap();
        let names: Vec<&str> = steps.iter().map(|s| s.name.as_str()).collect();

        assert_eq!(names, ["first step", "second step", "third step"]);
    }

    #[test]
    fn test_extending_places_parent_steps_first() {
        let parent = Runbook::new("Base")
            .preamble("shared preamble")
            .step(StepUnit::new("prepare"))
            .step(StepUnit::new("verify_access"));

        let child = Runbook::new("Child")
            .step(StepUnit::new("deploy"))
            .step(StepUnit::new("announce"))
            .extending(parent);

        let steps = child.steps().unwrap();
        let names: Vec<&str> = steps.iter().map(|s| s.name.as_str()).collect();

        assert_eq!(names, ["prepare", "verify access", "deploy", "announce"]);
        assert_eq!(child.preamble.as_deref(), Some("shared preamble"));
    }

    #[test]
    fn test_reserved_and_non_letter_ids_are_excluded() {
        let book = Runbook::new("Test")
            .step(StepUnit::new("run"))
            .step(StepUnit::new("main"))
            .step(StepUnit::new("_private_helper"))
            .step(StepUnit::new("1st_step"))
            .step(StepUnit::new("real_step"));

        let steps = book.steps().unwrap();

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "real step");
    }

    #[test]
    fn test_describe_closure_wins_over_doc() {
        let book = Runbook::new("Test").step(
            StepUnit::new("step_one")
                .doc("from the doc")
                .describe(|| Some("a custom string".to_string())),
        );

        let steps = book.steps().unwrap();
        assert_eq!(steps[0].description, "a custom string");
    }

    #[test]
    fn test_describe_none_falls_back_to_doc() {
        let book = Runbook::new("Test")
            .step(StepUnit::new("step_one").doc("  Do ABC now.  ").describe(|| None));

        let steps = book.steps().unwrap();
        assert_eq!(steps[0].description, "Do ABC now.");
    }

    #[test]
    fn test_missing_doc_and_describe_yields_empty_description() {
        let book = Runbook::new("Test").step(StepUnit::new("step_one"));

        let steps = book.steps().unwrap();
        assert_eq!(steps[0].description, "");
    }

    #[test]
    fn test_doc_text_is_dedented() {
        let book = Runbook::new("Test").step(StepUnit::new("step_one").doc(
            "\n        Do ABC now.\n\n        Then do EFG.\n    ",
        ));

        let steps = book.steps().unwrap();
        assert_eq!(steps[0].description, "Do ABC now.\n\nThen do EFG.");
    }

    #[test]
    fn test_describe_invoked_exactly_once_per_extraction() {
        let calls = Rc::new(Cell::new(0u32));
        let seen = Rc::clone(&calls);

        let book = Runbook::new("Test").step(StepUnit::new("step_one").describe(move || {
            seen.set(seen.get() + 1);
            Some("described".to_string())
        }));

        book.steps().unwrap();
        assert_eq!(calls.get(), 1);

        book.steps().unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_skippable_and_critical_is_a_configuration_error() {
        let book = Runbook::new("Test")
            .step(StepUnit::new("fine_step"))
            .step(StepUnit::new("bad_step").skippable(true).critical(true));

        let err = book.steps().unwrap_err();
        assert!(matches!(err, RunbookError::Configuration(_)));
        assert!(err.to_string().contains("bad_step"));
    }

    #[test]
    fn test_step_flags_carry_through() {
        let book = Runbook::new("Test").step(
            StepUnit::new("the_second_step").repeatable(true).display_name("Second Step"),
        );

        let steps = book.steps().unwrap();
        assert!(steps[0].repeatable);
        assert!(!steps[0].skippable);
        assert!(!steps[0].critical);
        assert_eq!(steps[0].preferred_name(), "Second Step");
        assert_eq!(steps[0].name, "the second step");
    }

    #[test]
    fn test_dedent_handles_uniform_indent() {
        assert_eq!(dedent("    a\n    b"), "a\nb");
        assert_eq!(dedent("  a\n    b"), "a\n  b");
        assert_eq!(dedent("no indent"), "no indent");
        assert_eq!(dedent(""), "");
    }

    #[test]
    fn test_dedent_mixed_tabs_and_spaces_share_no_prefix() {
        assert_eq!(dedent("\ta\n  b"), "\ta\n  b");
        assert_eq!(dedent("\t\ta\n\t  b"), "\ta\n  b");
    }

    #[test]
    fn test_dedent_handles_multibyte_indent() {
        assert_eq!(dedent("\u{3000}a\n  b"), "\u{3000}a\n  b");
        assert_eq!(dedent("\u{3000}a\n\u{3000}b"), "a\nb");
    }

    #[test]
    fn test_doc_with_multibyte_indent_extracts_cleanly() {
        let book =
            Runbook::new("Test").step(StepUnit::new("step_one").doc("\u{3000}wide\n  narrow"));

        // the outer trim still eats the leading whitespace of the first
        // line; the second line's shorter ASCII indent survives
        let steps = book.steps().unwrap();
        assert_eq!(steps[0].description, "wide\n  narrow");
    }
}
