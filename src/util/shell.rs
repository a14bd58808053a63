//! Console status output.
//!
//! All human-facing status lines go through [`Shell`] so formatting stays
//! consistent: a right-aligned colored status word followed by the message,
//! printed to stderr. Per-configuration diagnostics live in the build logs,
//! not on the console.

use std::fmt::Display;
use std::io::{self, IsTerminal};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Default: stage progress plus failures and skips.
    #[default]
    Normal,
    /// --verbose: a status line for every pipeline at every stage.
    Verbose,
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // In-progress statuses (cyan)
    Probing,
    Configuring,
    Building,
    Testing,

    // Success status (green)
    Finished,

    // Warning statuses (yellow)
    Skipped,
    Warning,

    // Error status (red)
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Probing => "Probing",
            Status::Configuring => "Configuring",
            Status::Building => "Building",
            Status::Testing => "Testing",
            Status::Finished => "Finished",
            Status::Skipped => "Skipped",
            Status::Warning => "Warning",
            Status::Error => "error",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            // In-progress: bold cyan
            Status::Probing | Status::Configuring | Status::Building | Status::Testing => {
                "\x1b[1;36m"
            }
            // Success: bold green
            Status::Finished => "\x1b[1;32m",
            // Warning: bold yellow
            Status::Skipped | Status::Warning => "\x1b[1;33m",
            // Error: bold red
            Status::Error => "\x1b[1;31m",
        }
    }
}

/// Width of the status column.
const STATUS_WIDTH: usize = 12;

/// Central shell for all console output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    /// Create a new shell.
    pub fn new(verbosity: Verbosity, use_color: bool) -> Self {
        Shell {
            verbosity,
            use_color,
        }
    }

    /// Create a shell from CLI flags.
    ///
    /// Colors are used only when stderr is a terminal and `--no-color` was
    /// not given.
    pub fn from_flags(verbose: bool, no_color: bool) -> Self {
        let verbosity = if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        let use_color = !no_color && io::stderr().is_terminal();
        Shell::new(verbosity, use_color)
    }

    /// Check if shell is in verbose mode.
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Print a status message.
    ///
    /// Format: `{status:>12} {message}`
    pub fn status(&self, status: Status, msg: impl Display) {
        eprintln!("{} {}", self.format_status(status), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    /// Format a status prefix with optional color.
    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();

        if self.use_color {
            let color = status.color_code();
            format!("{}{:>width$}\x1b[0m", color, text, width = STATUS_WIDTH)
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, false)
    }
}
