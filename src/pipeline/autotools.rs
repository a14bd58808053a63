//! Stages of the `configure`-script pipeline.
//!
//! The configure script refuses to run when the source tree itself is still
//! configured from an earlier in-tree build. Its diagnostic tells the user
//! to `make distclean`; when that text shows up in a configure log the whole
//! run stops, because every other configuration would fail the same way.

use anyhow::Result;

use crate::config::RunConfig;
use crate::error::FatalError;
use crate::matrix::BuildConfig;
use crate::pipeline::{BuildLog, StageOutcome};
use crate::util::process::{ExecResult, ProcessBuilder};
use crate::workspace::ScratchWorkspace;

/// Diagnostic substring the configure script prints for an unclean tree.
const DISTCLEAN_HINT: &str = "make distclean";

/// Run the configure script with this configuration's axis values.
pub(crate) fn configure(
    config: &BuildConfig,
    log: &mut BuildLog,
    workspace: &ScratchWorkspace,
    run: &RunConfig,
) -> Result<StageOutcome> {
    let mut cmd = ProcessBuilder::new(run.source_dir.join("configure"))
        .arg(format!("CXX={}", config.candidate.cxx))
        .cwd(workspace.path());

    if config.candidate.stdlib.is_empty() {
        cmd = cmd.arg(format!("CXXFLAGS={}", config.opt));
    } else {
        cmd = cmd
            .arg(format!("CXXFLAGS={} {}", config.opt, config.candidate.stdlib))
            .arg(format!("LDFLAGS={}", config.candidate.stdlib));
    }

    cmd = cmd
        .arg("--disable-documentation")
        .args(&config.link.flags)
        .args(&config.debug.flags);

    match log.run(&cmd)? {
        ExecResult::Success => {
            log.ok()?;
            Ok(StageOutcome::Passed)
        }
        ExecResult::Failed(_) | ExecResult::NotFound(_) => {
            if log.contains(DISTCLEAN_HINT)? {
                return Err(FatalError::AlreadyConfigured.into());
            }
            log.fail("configure failed.")?;
            Ok(StageOutcome::Failed("configure failed.".to_string()))
        }
    }
}

/// Build the library, then the test binaries.
///
/// The empty `TESTS=` suppresses actually running the tests; that happens
/// in the next stage.
pub(crate) fn build(
    log: &mut BuildLog,
    workspace: &ScratchWorkspace,
    run: &RunConfig,
) -> Result<StageOutcome> {
    let jobs = format!("-j{}", run.jobs);
    let commands = [
        ProcessBuilder::new("make").arg(&jobs).cwd(workspace.path()),
        ProcessBuilder::new("make")
            .arg(&jobs)
            .arg("check")
            .arg("TESTS=")
            .cwd(workspace.path()),
    ];

    for cmd in commands {
        match log.run(&cmd)? {
            ExecResult::Success => {}
            ExecResult::Failed(reason) => {
                log.fail(&reason)?;
                return Ok(StageOutcome::Failed(reason));
            }
            ExecResult::NotFound(program) => {
                let reason = format!("`{}` not found.", program);
                log.fail(&reason)?;
                return Ok(StageOutcome::Failed(reason));
            }
        }
    }

    log.ok()?;
    Ok(StageOutcome::Passed)
}
