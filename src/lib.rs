//! Armada - a brute-force build-matrix test harness for C and C++ libraries
//!
//! This crate provides the core library functionality for Armada: probing
//! which compiler/stdlib combinations are usable on the host, expanding the
//! surviving axes into a cross-product of build configurations, and driving
//! each configuration through a configure/build/test pipeline with one log
//! file per configuration.
//!
//! Armada never touches the source tree it tests; every build happens in a
//! temporary directory that is removed when the run finishes.

pub mod config;
pub mod error;
pub mod matrix;
pub mod ops;
pub mod pipeline;
pub mod probe;
pub mod runner;
pub mod util;
pub mod workspace;

pub use config::RunConfig;
pub use error::FatalError;
pub use matrix::{BuildConfig, DebugMix, LinkMode};
pub use pipeline::{Pipeline, StageOutcome};
pub use probe::CompilerCandidate;
pub use runner::Report;
