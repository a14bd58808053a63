//! Per-run configuration.

use std::path::PathBuf;
use std::thread;

use crate::matrix::{DebugMix, LinkMode};

/// Everything a matrix run needs to know, gathered in one place.
///
/// Defaults that would otherwise be scattered module-level constants (the
/// compiler version tables, the host CPU count) are constructed through the
/// `default_*` functions below, so every override point is explicit.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Compiler executables to try.
    pub compilers: Vec<String>,
    /// Standard-library flags to try; an empty string means the default.
    pub stdlibs: Vec<String>,
    /// Optimization levels to matrix over.
    pub opt_levels: Vec<String>,
    /// Link modes to matrix over.
    pub link_modes: Vec<LinkMode>,
    /// Debug-instrumentation mixes to matrix over.
    pub debug_mixes: Vec<DebugMix>,
    /// Directory receiving one log file per configuration. Must exist.
    pub logs_dir: PathBuf,
    /// Absolute path to the source tree under test.
    pub source_dir: PathBuf,
    /// Parallel job count passed to the build tool.
    pub jobs: usize,
    /// Truncate every axis to one element for a harness smoke run.
    pub minimal: bool,
    /// Surface probe diagnostics and per-pipeline status lines.
    pub verbose: bool,
}

/// GCC and Clang versions worth trying by default.
pub fn default_compilers() -> Vec<String> {
    let gcc = (7..12).map(|ver| format!("g++-{}", ver));
    let clang = std::iter::once("clang++-6.0".to_string())
        .chain((7..12).map(|ver| format!("clang++-{}", ver)));
    gcc.chain(clang).collect()
}

/// The compiler's own stdlib, plus libc++.
pub fn default_stdlibs() -> Vec<String> {
    vec![String::new(), "-stdlib=libc++".to_string()]
}

/// The two optimization extremes; intermediate levels rarely find anything
/// the extremes miss.
pub fn default_opt_levels() -> Vec<String> {
    vec!["-O0".to_string(), "-O3".to_string()]
}

/// Static-only and dynamic-only link modes.
pub fn default_link_modes() -> Vec<LinkMode> {
    vec![
        LinkMode::new("static", &["--enable-static", "--disable-dynamic"]),
        LinkMode::new("dynamic", &["--disable-static", "--enable-dynamic"]),
    ]
}

/// Debug-instrumentation mixes, from nothing to everything.
pub fn default_debug_mixes() -> Vec<DebugMix> {
    vec![
        DebugMix::new("plain", &[]),
        DebugMix::new("audit", &["--enable-audit"]),
        DebugMix::new("maintainer", &["--enable-maintainer-mode"]),
        DebugMix::new("full", &["--enable-audit", "--enable-maintainer-mode"]),
    ]
}

/// Host CPU count, used as the default `-j` value.
pub fn default_jobs() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}
