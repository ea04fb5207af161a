//! A staging deploy procedure. Run with `cargo run --example deploy`.

use std::process::ExitCode;

use runbook::{Runbook, StepUnit};

fn definition() -> Runbook {
    Runbook::new("StagingDeploy")
        .preamble(
            "
            Staging deploy drill. Have the release channel open in another
            window before you start.
            ",
        )
        .step(StepUnit::new("announce_the_deploy").doc(
            "
            Post in the release channel that a staging deploy is starting.
            ",
        ))
        .step(StepUnit::new("run_the_test_suite").describe(|| {
            Some(format!("Run `make test` on {} and wait for green.", "the release branch"))
        }))
        .step(
            StepUnit::new("tag_the_release").critical(true).doc(
                "
                Tag the current commit. The tag is what ships; without it
                there is nothing to roll back to.
                ",
            ),
        )
        .step(
            StepUnit::new("watch_the_dashboards")
                .repeatable(true)
                .display_name("Watch the dashboards")
                .doc(
                    "
                    Watch error rates for ten minutes after the rollout.
                    ",
                ),
        )
        .step(StepUnit::new("tidy_up").skippable(true).doc(
            "
            Close the deploy ticket and archive the channel thread.
            ",
        ))
}

fn main() -> ExitCode {
    definition().main()
}
