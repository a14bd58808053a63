//! Run-fatal error conditions.

use std::path::PathBuf;

use thiserror::Error;

/// Conditions that abort the entire run.
///
/// Everything else - a compiler that fails the probe, a configuration whose
/// build breaks - is handled locally and only drops the affected
/// configuration. These three are different: continuing the run would either
/// produce no useful output or paper over an operator mistake.
#[derive(Debug, Error)]
pub enum FatalError {
    /// The logs destination does not exist or is not a directory.
    #[error("logs location `{}` is not a directory", .0.display())]
    LogsDir(PathBuf),

    /// Probing excluded every compiler/stdlib pair.
    #[error("did not find any viable compilers; tried: {0}")]
    NoViableCompilers(String),

    /// The source tree is still configured from an earlier in-tree build.
    ///
    /// The configure script refuses to run in that state, and every
    /// configuration in the matrix would fail the same way, so the run
    /// stops at the first occurrence.
    #[error("configure failed; did you remember to `make distclean` the source tree?")]
    AlreadyConfigured,
}
