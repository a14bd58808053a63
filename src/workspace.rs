//! Scratch build directories.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// A minimal C++ translation unit that any working toolchain can compile.
const PROBE_SOURCE: &str = "\
#include <iostream>
int main()
{
    std::cout << \"Hello world.\" << std::endl;
}
";

/// An isolated temporary build directory.
///
/// The directory is removed when the workspace is dropped, on every exit
/// path. Nothing outside the workspace is ever written to, which is what
/// lets the harness run against a pristine source tree.
#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: TempDir,
}

impl ScratchWorkspace {
    /// Create a fresh scratch directory.
    pub fn create() -> Result<Self> {
        let dir = TempDir::new().context("failed to create scratch directory")?;
        Ok(ScratchWorkspace { dir })
    }

    /// Path of the scratch directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write the probe translation unit into the workspace.
    ///
    /// Returns the file's full path. Compiling this file is the cheapest
    /// way to find out whether a compiler invocation works at all.
    pub fn probe_source(&self) -> Result<PathBuf> {
        let path = self.dir.path().join("check.cxx");
        fs::write(&path, PROBE_SOURCE)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}
