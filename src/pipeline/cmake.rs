//! Stages of the CMake pipeline.
//!
//! CMake builds are not matrixed; one pipeline per run, default build type.
//! The configure stage picks a generator from an ordered candidate list and
//! records that generator's build command for the build stage. A host
//! without CMake skips the pipeline altogether, which is not a failure.

use anyhow::Result;

use crate::config::RunConfig;
use crate::pipeline::{BuildLog, StageOutcome};
use crate::util::process::{find_executable, ExecResult, ProcessBuilder};
use crate::util::shell::{Shell, Status};
use crate::workspace::ScratchWorkspace;

/// The CMake pipeline's log file. There is only ever one of these per run,
/// so the name carries no axis values.
pub(crate) const LOG_FILE_NAME: &str = "build-cmake.log";

/// Mutable state the CMake backend accumulates during configure.
#[derive(Debug, Default)]
pub struct CMakeState {
    /// Build command of the generator that won. Resolved during configure.
    command: Option<Vec<String>>,
}

/// Candidate generators, preferred first.
///
/// Each entry pairs a value for cmake's `-G` option (`None` for cmake's
/// default) with the command line that drives the resulting build. Ninja is
/// fast when it is around; the default generator always exists and builds
/// with plain make.
fn generators(jobs: usize) -> Vec<(Option<&'static str>, Vec<String>)> {
    vec![
        (Some("Ninja"), vec!["ninja".to_string()]),
        (None, vec!["make".to_string(), format!("-j{}", jobs)]),
    ]
}

/// Initialize the build directory with the first generator that works.
pub(crate) fn configure(
    state: &mut CMakeState,
    log: &mut BuildLog,
    workspace: &ScratchWorkspace,
    run: &RunConfig,
    shell: &Shell,
) -> Result<StageOutcome> {
    if find_executable("cmake").is_none() {
        return Ok(StageOutcome::Skipped("no cmake found.".to_string()));
    }

    for (generator, command) in generators(run.jobs) {
        let name = generator.unwrap_or("<default>");

        // The generator's build tool has to exist too; `-G Ninja` on a host
        // without ninja would configure a build nothing can run.
        if find_executable(&command[0]).is_none() {
            shell.status(
                Status::Skipped,
                format!("CMake generator {} is not available.", name),
            );
            continue;
        }

        let mut cmd = ProcessBuilder::new("cmake")
            .arg(&run.source_dir)
            .cwd(workspace.path());
        if let Some(generator) = generator {
            cmd = cmd.arg("-G").arg(generator);
        }

        match log.run(&cmd)? {
            ExecResult::Success => {
                state.command = Some(command);
                log.ok()?;
                return Ok(StageOutcome::Passed);
            }
            ExecResult::NotFound(_) => {
                return Ok(StageOutcome::Skipped("no cmake found.".to_string()));
            }
            ExecResult::Failed(_) => {
                shell.status(
                    Status::Skipped,
                    format!("CMake generator {} is not available.", name),
                );
            }
        }
    }

    Ok(StageOutcome::Skipped(
        "did not find any working CMake generators.".to_string(),
    ))
}

/// Run the recorded build command, then the test binary it produced.
pub(crate) fn build(
    state: &CMakeState,
    log: &mut BuildLog,
    workspace: &ScratchWorkspace,
) -> Result<StageOutcome> {
    let Some(command) = &state.command else {
        return Ok(StageOutcome::Failed(
            "no build command was configured.".to_string(),
        ));
    };

    let runner = workspace.path().join("test").join("runner");
    let commands = [
        ProcessBuilder::new(&command[0])
            .args(&command[1..])
            .cwd(workspace.path()),
        ProcessBuilder::new(&runner).cwd(workspace.path()),
    ];

    for cmd in commands {
        match log.run(&cmd)? {
            ExecResult::Success => {}
            ExecResult::Failed(_) | ExecResult::NotFound(_) => {
                log.fail("CMake build failed.")?;
                return Ok(StageOutcome::Failed("CMake build failed.".to_string()));
            }
        }
    }

    log.ok()?;
    Ok(StageOutcome::Passed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generator_preference_order() {
        let gens = generators(4);
        assert_eq!(gens[0].0, Some("Ninja"));
        assert_eq!(gens[0].1, vec!["ninja"]);

        // The default generator comes last and always exists.
        let (last_name, last_command) = gens.last().unwrap();
        assert_eq!(*last_name, None);
        assert_eq!(*last_command, vec!["make".to_string(), "-j4".to_string()]);
    }

    #[test]
    fn test_build_without_configured_command_fails() {
        let logs = TempDir::new().unwrap();
        let mut log = BuildLog::create(logs.path(), LOG_FILE_NAME).unwrap();
        let workspace = ScratchWorkspace::create().unwrap();

        let outcome = build(&CMakeState::default(), &mut log, &workspace).unwrap();
        assert!(matches!(outcome, StageOutcome::Failed(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_failure_is_recorded_in_the_log() {
        let logs = TempDir::new().unwrap();
        let mut log = BuildLog::create(logs.path(), LOG_FILE_NAME).unwrap();
        let workspace = ScratchWorkspace::create().unwrap();
        let state = CMakeState {
            command: Some(vec!["false".to_string()]),
        };

        let outcome = build(&state, &mut log, &workspace).unwrap();
        assert_eq!(outcome, StageOutcome::Failed("CMake build failed.".to_string()));

        let contents = fs::read_to_string(log.path()).unwrap();
        assert!(contents.ends_with("FAIL: CMake build failed.\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_runs_command_then_test_binary() {
        use std::os::unix::fs::PermissionsExt;

        let logs = TempDir::new().unwrap();
        let mut log = BuildLog::create(logs.path(), LOG_FILE_NAME).unwrap();
        let workspace = ScratchWorkspace::create().unwrap();

        let test_dir = workspace.path().join("test");
        fs::create_dir(&test_dir).unwrap();
        let runner = test_dir.join("runner");
        fs::write(&runner, "#!/bin/sh\necho cmake tests passed\nexit 0\n").unwrap();
        let mut perms = fs::metadata(&runner).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&runner, perms).unwrap();

        let state = CMakeState {
            command: Some(vec!["echo".to_string(), "building".to_string()]),
        };

        let outcome = build(&state, &mut log, &workspace).unwrap();
        assert_eq!(outcome, StageOutcome::Passed);

        let contents = fs::read_to_string(log.path()).unwrap();
        assert!(contents.contains("building"));
        assert!(contents.contains("cmake tests passed"));
        assert!(contents.ends_with("OK\n"));
    }
}
