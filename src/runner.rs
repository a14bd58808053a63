//! Driving pipelines through their stages.
//!
//! All pipelines run configure, then the configure survivors run build,
//! then the build survivors run test. A pipeline that fails a stage is
//! dropped on the spot; dropping it removes its scratch workspace and
//! closes its log, so resource release does not depend on reaching the end
//! of the run. The run-fatal abort unwinds through here the same way, with
//! every remaining pipeline cleaned up as the collections drop.

use std::fmt;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::RunConfig;
use crate::pipeline::{Pipeline, Stage, StageOutcome};
use crate::util::shell::{Shell, Status};

/// Aggregate outcome of a whole run.
///
/// Skipped pipelines count toward `total` but are reported separately; a
/// skip means the backend did not apply on this host, not that a build
/// broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Pipelines that completed the test stage successfully.
    pub passed: usize,
    /// Pipelines excluded as structurally inapplicable.
    pub skipped: usize,
    /// Pipelines attempted.
    pub total: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Passed {} out of {} builds.", self.passed, self.total)?;
        if self.skipped > 0 {
            write!(f, " ({} skipped.)", self.skipped)?;
        }
        Ok(())
    }
}

/// Run every pipeline through all three stages and tally the outcome.
pub fn run(pipelines: Vec<Pipeline>, run: &RunConfig, shell: &Shell) -> Result<Report> {
    let total = pipelines.len();
    let mut skipped = 0;

    let configured = run_step(pipelines, Stage::Configure, run, shell, &mut skipped)?;
    let built = run_step(configured, Stage::Build, run, shell, &mut skipped)?;
    let passed = run_step(built, Stage::Test, run, shell, &mut skipped)?;

    Ok(Report {
        passed: passed.len(),
        skipped,
        total,
    })
}

/// Run one stage across a collection of pipelines, returning the survivors.
///
/// A `Skipped` outcome excludes the pipeline with an informational notice
/// and bumps the skip tally. A `Failed` outcome excludes it with an error
/// line; the details are already in its log. Run-fatal errors propagate,
/// dropping the stage's pipelines on the way out.
fn run_step(
    pipelines: Vec<Pipeline>,
    stage: Stage,
    run: &RunConfig,
    shell: &Shell,
    skipped: &mut usize,
) -> Result<Vec<Pipeline>> {
    let pb = progress_bar(pipelines.len(), shell);
    let notice = |status: Status, msg: String| match &pb {
        Some(pb) => pb.suspend(|| shell.status(status, &msg)),
        None => shell.status(status, &msg),
    };

    let mut survivors = Vec::with_capacity(pipelines.len());
    for mut pipeline in pipelines {
        let name = pipeline.name();
        match &pb {
            Some(pb) => pb.set_message(name.clone()),
            None => shell.status(stage.status(), &name),
        }

        let outcome = match pipeline.run_stage(stage, run, shell) {
            Ok(outcome) => outcome,
            Err(err) => {
                if let Some(pb) = &pb {
                    pb.finish_and_clear();
                }
                return Err(err);
            }
        };

        match outcome {
            StageOutcome::Passed => survivors.push(pipeline),
            StageOutcome::Failed(reason) => {
                notice(Status::Error, format!("{}: {}", name, reason));
            }
            StageOutcome::Skipped(reason) => {
                *skipped += 1;
                notice(Status::Skipped, format!("{}: {}", name, reason));
            }
        }

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    Ok(survivors)
}

fn progress_bar(total: usize, shell: &Shell) -> Option<ProgressBar> {
    if shell.is_verbose() || total <= 1 {
        return None;
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    Some(pb)
}
