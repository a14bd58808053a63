//! Configuration matrix expansion.
//!
//! The matrix has four independent axes: surviving compiler/stdlib pairs,
//! optimization levels, link modes, and debug mixes. Expansion produces the
//! full cross-product in a fixed order so that two runs over the same inputs
//! emit their logs in the same sequence.

use crate::probe::CompilerCandidate;

/// A named link mode and the configure flags that select it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMode {
    pub name: String,
    pub flags: Vec<String>,
}

impl LinkMode {
    pub fn new(name: impl Into<String>, flags: &[&str]) -> Self {
        LinkMode {
            name: name.into(),
            flags: flags.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// A named debug-instrumentation mix and the configure flags that select it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugMix {
    pub name: String,
    pub flags: Vec<String>,
}

impl DebugMix {
    pub fn new(name: impl Into<String>, flags: &[&str]) -> Self {
        DebugMix {
            name: name.into(),
            flags: flags.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// One point in the cross-product of all build axes.
///
/// Immutable once created. Its identity string names the configuration's
/// log file, so it must be deterministic and collision-free across all
/// axis values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub candidate: CompilerCandidate,
    pub opt: String,
    pub link: LinkMode,
    pub debug: DebugMix,
}

impl BuildConfig {
    /// Identifier derived from all five axis values.
    ///
    /// The empty stdlib flag renders as `default` so that it stays visible
    /// in the name, and path separators and whitespace inside axis values
    /// are mapped to `-` so the result is always a single file name.
    pub fn name(&self) -> String {
        let stdlib = if self.candidate.stdlib.is_empty() {
            "default"
        } else {
            &self.candidate.stdlib
        };
        [
            self.candidate.cxx.as_str(),
            self.opt.as_str(),
            stdlib,
            self.link.name.as_str(),
            self.debug.name.as_str(),
        ]
        .map(sanitize)
        .join("_")
    }

    /// Log file name for this configuration.
    pub fn log_file_name(&self) -> String {
        format!("build-{}.log", self.name())
    }
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_whitespace() {
                '-'
            } else {
                c
            }
        })
        .collect()
}

/// Expand the axes into the full list of build configurations.
///
/// Iteration order: optimization levels sorted, then link modes sorted by
/// name, then debug mixes sorted by name, then compiler pairs in probe
/// discovery order. The order only affects log emission and exists for
/// reproducible output.
///
/// With `minimal`, every axis is truncated to its first element (post-sort)
/// before the cross-product. That yields a single configuration and is
/// meant for smoke-testing the harness itself, not the library under test.
pub fn expand(
    candidates: &[CompilerCandidate],
    opt_levels: &[String],
    link_modes: &[LinkMode],
    debug_mixes: &[DebugMix],
    minimal: bool,
) -> Vec<BuildConfig> {
    let mut opts: Vec<&String> = opt_levels.iter().collect();
    opts.sort();

    let mut links: Vec<&LinkMode> = link_modes.iter().collect();
    links.sort_by(|a, b| a.name.cmp(&b.name));

    let mut debugs: Vec<&DebugMix> = debug_mixes.iter().collect();
    debugs.sort_by(|a, b| a.name.cmp(&b.name));

    let mut pairs: Vec<&CompilerCandidate> = candidates.iter().collect();

    if minimal {
        opts.truncate(1);
        links.truncate(1);
        debugs.truncate(1);
        pairs.truncate(1);
    }

    let mut configs = Vec::with_capacity(opts.len() * links.len() * debugs.len() * pairs.len());
    for opt in &opts {
        for link in &links {
            for debug in &debugs {
                for pair in &pairs {
                    configs.push(BuildConfig {
                        candidate: (*pair).clone(),
                        opt: (*opt).clone(),
                        link: (*link).clone(),
                        debug: (*debug).clone(),
                    });
                }
            }
        }
    }
    configs
}
