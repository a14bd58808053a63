//! Shared utilities

pub mod process;
pub mod shell;

pub use process::{ExecResult, ProcessBuilder};
pub use shell::{Shell, Status, Verbosity};
