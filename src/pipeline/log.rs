//! Per-configuration build logs.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::process::{ExecResult, ProcessBuilder};

/// The log file for one build configuration.
///
/// Every command run against the log is echoed before its combined output,
/// and the log ends with an explicit `OK` or `FAIL` marker, so a log on its
/// own is enough to reconstruct what happened. The file persists after the
/// run; the handle closes when the log is dropped.
#[derive(Debug)]
pub struct BuildLog {
    path: PathBuf,
    file: File,
}

impl BuildLog {
    /// Create (truncating) the log file `file_name` inside `logs_dir`.
    pub fn create(logs_dir: &Path, file_name: &str) -> Result<Self> {
        let path = logs_dir.join(file_name);
        let file = File::create(&path)
            .with_context(|| format!("failed to create build log {}", path.display()))?;
        Ok(BuildLog { path, file })
    }

    /// Full path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The log's file name, used as the configuration's display identity.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Echo the command line into the log, then run the command with its
    /// combined output appended.
    pub fn run(&mut self, cmd: &ProcessBuilder) -> Result<ExecResult> {
        writeln!(self.file, "{}\n", cmd.display_command())
            .with_context(|| format!("failed to write build log {}", self.path.display()))?;
        self.file.flush()?;
        cmd.exec_to_file(&self.file)
    }

    /// Write the closing success marker.
    pub fn ok(&mut self) -> Result<()> {
        self.marker("OK")
    }

    /// Write the closing failure marker with the causing error.
    pub fn fail(&mut self, reason: &str) -> Result<()> {
        self.marker(&format!("FAIL: {}", reason))
    }

    fn marker(&mut self, message: &str) -> Result<()> {
        write!(self.file, "\n\n{}\n", message)
            .with_context(|| format!("failed to write build log {}", self.path.display()))?;
        self.file.flush()?;
        Ok(())
    }

    /// Does any line of the log contain `text`?
    ///
    /// Reads the file back from disk, so output written by child processes
    /// through their own handles is seen too.
    pub fn contains(&mut self, text: &str) -> Result<bool> {
        self.file.flush()?;
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read back build log {}", self.path.display()))?;
        Ok(contents.lines().any(|line| line.contains(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_echoes_command_and_output() {
        let tmp = TempDir::new().unwrap();
        let mut log = BuildLog::create(tmp.path(), "build-sample.log").unwrap();

        let result = log.run(&ProcessBuilder::new("echo").arg("hello")).unwrap();
        assert_eq!(result, ExecResult::Success);

        let contents = fs::read_to_string(log.path()).unwrap();
        assert!(contents.contains("echo hello"));
        assert!(contents.contains("hello"));
    }

    #[test]
    fn test_ok_and_fail_markers() {
        let tmp = TempDir::new().unwrap();

        let mut log = BuildLog::create(tmp.path(), "build-ok.log").unwrap();
        log.ok().unwrap();
        let contents = fs::read_to_string(log.path()).unwrap();
        assert!(contents.ends_with("OK\n"));

        let mut log = BuildLog::create(tmp.path(), "build-fail.log").unwrap();
        log.fail("configure failed.").unwrap();
        let contents = fs::read_to_string(log.path()).unwrap();
        assert!(contents.ends_with("FAIL: configure failed.\n"));
    }

    #[test]
    fn test_contains_sees_child_output() {
        let tmp = TempDir::new().unwrap();
        let mut log = BuildLog::create(tmp.path(), "build-grep.log").unwrap();

        log.run(&ProcessBuilder::new("echo").arg("make distclean first"))
            .unwrap();
        assert!(log.contains("make distclean").unwrap());
        assert!(!log.contains("no such text").unwrap());
    }

    #[test]
    fn test_name_is_file_name() {
        let tmp = TempDir::new().unwrap();
        let log = BuildLog::create(tmp.path(), "build-x.log").unwrap();
        assert_eq!(log.name(), "build-x.log");
    }

    #[test]
    fn test_log_persists_after_drop() {
        let tmp = TempDir::new().unwrap();
        let path = {
            let mut log = BuildLog::create(tmp.path(), "build-keep.log").unwrap();
            log.ok().unwrap();
            log.path().to_path_buf()
        };
        assert!(path.exists());
    }
}
