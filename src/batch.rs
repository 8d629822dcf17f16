//! Parallel compilation of independent units.

use rayon::prelude::*;
use tracing::debug;
use uigraph_compiler::{CompilationResult, CompilerOptions, UnitDriver, UnitSource};
use uigraph_core::CompileError;
use uigraph_registry::ClassLibrary;

/// Compile every source against a shared, read-only library.
///
/// Results come back in input order. Each unit owns its tree, field table
/// and emission buffer; a failure in one unit does not affect the others.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile_batch<L>(
    library: &L,
    options: &CompilerOptions,
    sources: Vec<UnitSource>,
) -> Vec<Result<CompilationResult, CompileError>>
where
    L: ClassLibrary + Sync,
{
    debug!(units = sources.len(), "compiling batch");
    sources
        .into_par_iter()
        .map(|source| UnitDriver::new(library, options).compile(source))
        .collect()
}
