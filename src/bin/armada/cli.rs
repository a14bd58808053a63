//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use armada::config::{
    self, default_compilers, default_opt_levels, default_stdlibs,
};
use armada::RunConfig;

/// Armada - brute-force build-matrix testing for C and C++ libraries
///
/// Armada makes no changes in the source tree; all builds happen in
/// temporary directories. You may need to run "make distclean" in the
/// source tree first, since the configure script refuses to run otherwise.
#[derive(Parser)]
#[command(name = "armada")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Compilers to try, separated by commas
    #[arg(short, long, value_name = "LIST", allow_hyphen_values = true, overrides_with = "compilers")]
    pub compilers: Option<String>,

    /// Options for choosing a standard library, separated by commas
    #[arg(short = 'L', long, value_name = "LIST", allow_hyphen_values = true, overrides_with = "stdlibs")]
    pub stdlibs: Option<String>,

    /// Alternative optimization options, separated by commas
    #[arg(short = 'O', long, value_name = "LIST", allow_hyphen_values = true, overrides_with = "optimize")]
    pub optimize: Option<String>,

    /// Write build logs to DIRECTORY
    #[arg(short, long, value_name = "DIRECTORY", default_value = ".")]
    pub logs: PathBuf,

    /// Source tree to test (defaults to the current directory)
    #[arg(long, value_name = "DIRECTORY", default_value = ".")]
    pub source_dir: PathBuf,

    /// When running make, run up to CPUS concurrent processes
    #[arg(short, long, value_name = "CPUS")]
    pub jobs: Option<usize>,

    /// Make the run as short as possible, for testing the harness itself
    #[arg(short, long)]
    pub minimal: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Turn the parsed flags into a run configuration, filling in the
    /// default value tables for anything not given.
    pub fn into_run_config(self) -> RunConfig {
        RunConfig {
            compilers: self
                .compilers
                .map(|list| split_list(&list))
                .unwrap_or_else(default_compilers),
            stdlibs: self
                .stdlibs
                .map(|list| split_list(&list))
                .unwrap_or_else(default_stdlibs),
            opt_levels: self
                .optimize
                .map(|list| split_list(&list))
                .unwrap_or_else(default_opt_levels),
            link_modes: config::default_link_modes(),
            debug_mixes: config::default_debug_mixes(),
            logs_dir: self.logs,
            source_dir: self.source_dir,
            jobs: self.jobs.unwrap_or_else(config::default_jobs),
            minimal: self.minimal,
            verbose: self.verbose,
        }
    }
}

/// Split a comma-separated option value.
///
/// Empty entries are kept; an empty stdlib entry means the compiler's
/// default standard library.
fn split_list(input: &str) -> Vec<String> {
    input.split(',').map(str::to_string).collect()
}
