//! Compiler availability probing.
//!
//! Before a matrix run commits to dozens of configure/build/test cycles, it
//! checks which (compiler, stdlib flag) pairs can actually compile anything.
//! A pair that cannot is excluded from the matrix without further comment;
//! an unavailable compiler version is an everyday situation, not an error.

use anyhow::Result;

use crate::util::process::ProcessBuilder;
use crate::util::shell::{Shell, Status};
use crate::workspace::ScratchWorkspace;

/// A compiler paired with a standard-library selection flag.
///
/// The stdlib flag may be empty, meaning the compiler's default library.
/// Candidates are immutable once probed; survivors feed the configuration
/// matrix and the rest are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerCandidate {
    /// Compiler executable name, e.g. `g++-11` or `clang++-9`.
    pub cxx: String,
    /// Standard-library flag, e.g. `-stdlib=libc++`, or empty.
    pub stdlib: String,
}

impl CompilerCandidate {
    /// Human-readable label for messages, e.g. `clang++-9 -stdlib=libc++`.
    pub fn label(&self) -> String {
        if self.stdlib.is_empty() {
            self.cxx.clone()
        } else {
            format!("{} {}", self.cxx, self.stdlib)
        }
    }
}

/// Check which compiler/stdlib pairs are viable.
///
/// Every pair in the cross-product of `compilers` and `stdlibs` gets one
/// attempt at compiling the probe source inside a shared scratch workspace.
/// The returned list preserves discovery order: stdlib flags outermost,
/// compilers innermost. Probing mutates no persistent state, so repeating
/// it with the same inputs yields the same survivors.
pub fn probe(compilers: &[String], stdlibs: &[String], shell: &Shell) -> Result<Vec<CompilerCandidate>> {
    let workspace = ScratchWorkspace::create()?;
    let source = workspace.probe_source()?;

    let mut survivors = Vec::new();
    for stdlib in stdlibs {
        for cxx in compilers {
            if check_compiler(&workspace, cxx, stdlib, &source, shell) {
                survivors.push(CompilerCandidate {
                    cxx: cxx.clone(),
                    stdlib: stdlib.clone(),
                });
            }
        }
    }
    Ok(survivors)
}

/// Is the given compiler combo available?
///
/// Not-found and failed-to-compile are deliberately indistinguishable here;
/// either way the pair is unusable.
fn check_compiler(
    workspace: &ScratchWorkspace,
    cxx: &str,
    stdlib: &str,
    source: &std::path::Path,
    shell: &Shell,
) -> bool {
    let mut cmd = ProcessBuilder::new(cxx).arg(source).cwd(workspace.path());
    if !stdlib.is_empty() {
        cmd = cmd.arg(stdlib);
    }

    match cmd.exec() {
        Ok(output) if output.status.success() => {
            tracing::debug!("probe succeeded for `{} {}`", cxx, stdlib);
            true
        }
        Ok(output) => {
            if shell.is_verbose() {
                eprint!("{}", String::from_utf8_lossy(&output.stderr));
                shell.status(
                    Status::Skipped,
                    format!("can't build with `{} {}`", cxx, stdlib),
                );
            }
            tracing::debug!("probe compile failed for `{} {}`", cxx, stdlib);
            false
        }
        Err(err) => {
            if shell.is_verbose() {
                shell.status(
                    Status::Skipped,
                    format!("can't build with `{} {}`: {:#}", cxx, stdlib, err),
                );
            }
            tracing::debug!("probe spawn failed for `{} {}`: {:#}", cxx, stdlib, err);
            false
        }
    }
}
