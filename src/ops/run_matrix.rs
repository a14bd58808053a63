//! Implementation of a full matrix run.

use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::RunConfig;
use crate::error::FatalError;
use crate::matrix;
use crate::pipeline::Pipeline;
use crate::probe;
use crate::runner::{self, Report};
use crate::util::shell::{Shell, Status};

/// Probe, expand, and drive the whole matrix.
///
/// Returns the aggregate report; the per-configuration logs in
/// `config.logs_dir` are the detailed record. The `Err` branch carries only
/// run-fatal conditions, checked up front where possible so nothing gets
/// allocated for a run that cannot start.
pub fn run_matrix(config: &RunConfig, shell: &Shell) -> Result<Report> {
    if !config.logs_dir.is_dir() {
        return Err(FatalError::LogsDir(config.logs_dir.clone()).into());
    }

    let start = Instant::now();

    if shell.is_verbose() {
        shell.status(Status::Probing, "checking available compilers");
    }
    let survivors = probe::probe(&config.compilers, &config.stdlibs, shell)?;
    if survivors.is_empty() {
        return Err(FatalError::NoViableCompilers(config.compilers.join(", ")).into());
    }
    tracing::debug!(
        "{} of {} compiler/stdlib pairs survived probing",
        survivors.len(),
        config.compilers.len() * config.stdlibs.len()
    );

    let configs = matrix::expand(
        &survivors,
        &config.opt_levels,
        &config.link_modes,
        &config.debug_mixes,
        config.minimal,
    );

    // Configure is invoked by absolute path; a pipeline's working directory
    // is its own scratch workspace, not the source tree.
    let source_dir = config.source_dir.canonicalize().with_context(|| {
        format!(
            "failed to resolve source tree `{}`",
            config.source_dir.display()
        )
    })?;
    let run_config = RunConfig {
        source_dir,
        ..config.clone()
    };

    let mut pipelines = Vec::with_capacity(configs.len() + 1);
    for build_config in configs {
        pipelines.push(Pipeline::autotools(build_config, &run_config.logs_dir)?);
    }
    pipelines.push(Pipeline::cmake(&run_config.logs_dir)?);

    let report = runner::run(pipelines, &run_config, shell)?;

    shell.status(
        Status::Finished,
        format!(
            "{} configurations in {:.2}s",
            report.total,
            start.elapsed().as_secs_f64()
        ),
    );

    Ok(report)
}
