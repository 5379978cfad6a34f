//! msC compiler back end: syntax tree to MSC bytecode.
//!
//! This crate provides the compilation pipeline:
//! - `context` - symbol tables built by a top-level declaration scan
//! - `lower` - expression and statement lowering to symbolic instructions
//! - `assemble` - per-function prologue and epilogue
//! - `resolve` - whole-program label and function offset resolution
//!
//! The result is an [`msc_bytecode::Program`], ready to be serialized as an
//! MSCSB container.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod assemble;
pub mod ast;
pub mod context;
pub mod error;
pub mod escape;
pub mod ir;
mod lower;
mod resolve;
pub mod string_table;
pub mod syscalls;
mod verify;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod lower_tests;

use msc_bytecode::Program;

pub use assemble::{AssembledScript, assemble_script};
pub use ast::{Coord, TranslationUnit};
pub use context::{CompilationContext, ValueType};
pub use error::{CompileError, ResolveError};
pub use resolve::resolve;
pub use syscalls::{SyscallTable, Syscalls};

/// Code generation switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Insert int/float conversions around mismatched arithmetic operands
    /// and assignments.
    pub autocast: bool,
    /// Encode integer literals up to 0xFFFF with `pushShort`.
    pub short_literals: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            autocast: false,
            short_literals: true,
        }
    }
}

/// Errors that can occur during compilation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, Error>;

/// Compile a translation unit into a resolved program.
///
/// All-or-nothing: the first error aborts the whole compilation.
pub fn compile(
    unit: &TranslationUnit,
    options: &CompileOptions,
    syscalls: &Syscalls,
) -> Result<Program> {
    let mut ctx = CompilationContext::new(options, syscalls);
    ctx.scan(unit)?;

    let scripts = unit
        .functions()
        .map(|func| assemble_script(&mut ctx, func))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let strings = ctx.strings.into_vec();
    Ok(resolve(&scripts, strings)?)
}

/// Compile straight to MSCSB container bytes.
pub fn compile_to_bytes(
    unit: &TranslationUnit,
    options: &CompileOptions,
    syscalls: &Syscalls,
) -> Result<Vec<u8>> {
    compile(unit, options, syscalls).map(|program| program.to_bytes())
}
