//! Build pipelines.
//!
//! A pipeline drives one build configuration through three stages in order:
//! configure, build, test. Two backends exist, the `configure` script and
//! CMake; the set is closed, so dispatch is a match on a tagged enum rather
//! than a trait object.
//!
//! Each pipeline exclusively owns a scratch workspace and a log file. The
//! workspace disappears when the pipeline is dropped, on every exit path;
//! the log stays behind for postmortem reading.

pub mod autotools;
pub mod cmake;
pub mod log;

pub use log::BuildLog;

use std::path::Path;

use anyhow::Result;

use crate::config::RunConfig;
use crate::matrix::BuildConfig;
use crate::util::process::{ExecResult, ProcessBuilder};
use crate::util::shell::{Shell, Status};
use crate::workspace::ScratchWorkspace;

/// Result of running one stage of one pipeline.
///
/// `Skipped` is not a failure: it means the backend is structurally
/// inapplicable on this host, and the aggregate report keeps the two
/// apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage succeeded; the pipeline moves on to the next stage.
    Passed,
    /// The stage failed. The pipeline is dropped; its log has the details.
    Failed(String),
    /// The backend does not apply here, e.g. no CMake on the host.
    Skipped(String),
}

/// The three stages every pipeline passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configure,
    Build,
    Test,
}

impl Stage {
    /// Status word shown while this stage runs.
    pub fn status(self) -> Status {
        match self {
            Stage::Configure => Status::Configuring,
            Stage::Build => Status::Building,
            Stage::Test => Status::Testing,
        }
    }
}

/// Which build system drives a pipeline.
#[derive(Debug)]
pub enum Backend {
    /// The `configure` script, parameterized by one matrix configuration.
    Autotools(BuildConfig),
    /// CMake with a dynamically chosen generator. The matrix axes do not
    /// apply; the build command is discovered during configure.
    CMake(cmake::CMakeState),
}

/// One build moving through configure/build/test.
#[derive(Debug)]
pub struct Pipeline {
    backend: Backend,
    log: BuildLog,
    workspace: ScratchWorkspace,
}

impl Pipeline {
    /// Create an autotools pipeline for one matrix configuration.
    pub fn autotools(config: BuildConfig, logs_dir: &Path) -> Result<Self> {
        let log = BuildLog::create(logs_dir, &config.log_file_name())?;
        Ok(Pipeline {
            backend: Backend::Autotools(config),
            log,
            workspace: ScratchWorkspace::create()?,
        })
    }

    /// Create the CMake pipeline. One per run is enough; the CMake build
    /// type is not matrixed.
    pub fn cmake(logs_dir: &Path) -> Result<Self> {
        let log = BuildLog::create(logs_dir, cmake::LOG_FILE_NAME)?;
        Ok(Pipeline {
            backend: Backend::CMake(cmake::CMakeState::default()),
            log,
            workspace: ScratchWorkspace::create()?,
        })
    }

    /// The pipeline's display identity: its log file name.
    pub fn name(&self) -> String {
        self.log.name()
    }

    /// Run one stage.
    ///
    /// Stage failures come back as [`StageOutcome::Failed`] and stay local
    /// to this pipeline. The `Err` branch is reserved for run-fatal
    /// conditions, like the already-configured source tree.
    pub fn run_stage(&mut self, stage: Stage, run: &RunConfig, shell: &Shell) -> Result<StageOutcome> {
        match stage {
            Stage::Configure => match &mut self.backend {
                Backend::Autotools(config) => {
                    autotools::configure(config, &mut self.log, &self.workspace, run)
                }
                Backend::CMake(state) => {
                    cmake::configure(state, &mut self.log, &self.workspace, run, shell)
                }
            },
            Stage::Build => match &self.backend {
                Backend::Autotools(_) => autotools::build(&mut self.log, &self.workspace, run),
                Backend::CMake(state) => cmake::build(state, &mut self.log, &self.workspace),
            },
            Stage::Test => run_test_binary(&mut self.log, &self.workspace),
        }
    }
}

/// Run the test binary the build produced.
///
/// Both backends place it at the same fixed path under the build root.
fn run_test_binary(log: &mut BuildLog, workspace: &ScratchWorkspace) -> Result<StageOutcome> {
    let runner = workspace.path().join("test").join("runner");
    let cmd = ProcessBuilder::new(&runner).cwd(workspace.path());
    match log.run(&cmd)? {
        ExecResult::Success => {
            log.ok()?;
            Ok(StageOutcome::Passed)
        }
        ExecResult::Failed(_) | ExecResult::NotFound(_) => {
            log.fail("tests failed.")?;
            Ok(StageOutcome::Failed("tests failed.".to_string()))
        }
    }
}
