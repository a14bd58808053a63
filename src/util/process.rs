//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};

/// Fate of a command whose output was redirected to a build log.
///
/// A program that is missing outright is kept distinct from one that ran
/// and exited non-zero: the CMake backend treats a missing tool as "not
/// applicable here" rather than as a build failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecResult {
    /// Exited with status zero.
    Success,
    /// Ran but exited non-zero, or could not be started for a reason other
    /// than absence. Carries a human-readable description for the log.
    Failed(String),
    /// The program itself does not exist. Carries the program name.
    NotFound(String),
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Execute the command, capturing stdout and stderr.
    ///
    /// Fails only when the command could not be started; callers inspect
    /// the returned [`Output`] for the exit status.
    pub fn exec(&self) -> Result<Output> {
        self.build_command()
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))
    }

    /// Execute the command with both output streams attached to `sink`.
    ///
    /// The file handle is duplicated for stdout and stderr so the child's
    /// interleaving is preserved in the file. The command's own fate is the
    /// returned [`ExecResult`]; the `Err` branch is reserved for problems on
    /// our side of the fork, like a log handle that cannot be duplicated.
    pub fn exec_to_file(&self, sink: &File) -> Result<ExecResult> {
        let stdout = sink
            .try_clone()
            .context("failed to duplicate log file handle")?;
        let stderr = sink
            .try_clone()
            .context("failed to duplicate log file handle")?;

        let mut cmd = self.build_command();
        cmd.stdout(Stdio::from(stdout));
        cmd.stderr(Stdio::from(stderr));

        match cmd.status() {
            Ok(status) if status.success() => Ok(ExecResult::Success),
            Ok(status) => Ok(ExecResult::Failed(format!(
                "`{}` exited with {}",
                self.display_command(),
                status
            ))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Ok(ExecResult::NotFound(self.program.display().to_string()))
            }
            Err(err) => Ok(ExecResult::Failed(format!(
                "failed to start `{}`: {}",
                self.display_command(),
                err
            ))),
        }
    }

    /// Display the command for logs and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_process_builder() {
        let output = ProcessBuilder::new("echo").arg("hello").exec().unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.trim() == "hello" || stdout.contains("hello"));
    }

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("g++").args(["-O3", "check.cxx", "-stdlib=libc++"]);

        assert_eq!(pb.display_command(), "g++ -O3 check.cxx -stdlib=libc++");
    }

    #[test]
    fn test_exec_spawn_failure_is_error() {
        let result = ProcessBuilder::new("definitely-not-a-real-program-xyz").exec();
        assert!(result.is_err());
    }

    #[test]
    fn test_exec_to_file_captures_output() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.log");
        let file = File::create(&path).unwrap();

        let result = ProcessBuilder::new("echo")
            .arg("captured")
            .exec_to_file(&file)
            .unwrap();
        assert_eq!(result, ExecResult::Success);

        let mut contents = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert!(contents.contains("captured"));
    }

    #[test]
    fn test_exec_to_file_missing_program() {
        let tmp = TempDir::new().unwrap();
        let file = File::create(tmp.path().join("out.log")).unwrap();

        let result = ProcessBuilder::new("definitely-not-a-real-program-xyz")
            .exec_to_file(&file)
            .unwrap();
        assert!(matches!(result, ExecResult::NotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_to_file_nonzero_exit() {
        let tmp = TempDir::new().unwrap();
        let file = File::create(tmp.path().join("out.log")).unwrap();

        let result = ProcessBuilder::new("false").exec_to_file(&file).unwrap();
        assert!(matches!(result, ExecResult::Failed(_)));
    }
}
