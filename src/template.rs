//! Starter-definition scaffolding for the `runbook new` command.

/// A rendered scaffold: where to write it and what to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffold {
    /// Derived `snake_case.rs` file name.
    pub file_name: String,

    /// Full source of the starter definition.
    pub contents: String,
}

const TEMPLATE: &str = r#"use std::process::ExitCode;

use runbook::{Runbook, StepUnit};

fn definition() -> Runbook {
    Runbook::new("{name}")
        .preamble(
            "
            Welcome to your new runbook!

            This is the preamble. It is displayed in the console before
            each run of the book.
            ",
        )
        .step(StepUnit::new("first_step").doc(
            "
            Describe your first step here. The name of the step is the
            identifier it is registered under, and the description comes
            from this doc text or from a describe closure.
            ",
        ))
        .step(StepUnit::new("the_second_step").repeatable(true).display_name("Second Step").doc(
            "
            Steps run in the order they are registered.

            Extra settings customize a step:

            * `repeatable` - step can be repeated when resuming
            * `skippable` - step can be skipped by answering no
            * `critical` - step cannot be skipped and must be affirmative
            * `display_name` - alternative title for the step
            ",
        ))
}

fn main() -> ExitCode {
    definition().main()
}
"#;

/// Render a starter definition from a human title.
///
/// The title's words become the `CamelCase` definition name and the
/// `snake_case.rs` file name: `Custom Deploy` scaffolds `CustomDeploy`
/// in `custom_deploy.rs`.
#[must_use]
pub fn scaffold(title: &str) -> Scaffold {
    let mut type_name = String::new();
    let mut file_name = String::new();

    for part in title.split_whitespace() {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            type_name.extend(first.to_uppercase());
            type_name.push_str(chars.as_str());
        }

        if !file_name.is_empty() {
            file_name.push('_');
        }
        file_name.push_str(&part.to_lowercase());
    }
    file_name.push_str(".rs");

    Scaffold { file_name, contents: TEMPLATE.replace("{name}", &type_name) }
}
