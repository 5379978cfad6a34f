//! Errors raised while lowering and resolving a program.

use crate::ast::Coord;
use crate::escape::EscapeError;

/// Lowering and declaration errors. Each carries the offending node's position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("{coord}: invalid lvalue")]
    InvalidLvalue { coord: Coord },

    #[error("{coord}: invalid reference to `{name}`")]
    InvalidReference { name: String, coord: Coord },

    #[error("{coord}: function `{name}` does not exist")]
    UnknownFunction { name: String, coord: Coord },

    #[error("{coord}: syscall `{name}` not found")]
    UnknownSyscall { name: String, coord: Coord },

    #[error("{coord}: syscall `{syscall}` has no method `{method}`")]
    UnknownMethod {
        syscall: String,
        method: String,
        coord: Coord,
    },

    #[error("{coord}: unsupported operator `{op}`")]
    UnsupportedOperator { op: &'static str, coord: Coord },

    #[error("{coord}: switch discriminant must be a variable")]
    InvalidSwitch { coord: Coord },

    #[error("{coord}: `{name}` requires a function pointer argument")]
    MissingFunctionPointer { name: String, coord: Coord },

    #[error("{coord}: {error}")]
    InvalidEscape {
        #[source]
        error: EscapeError,
        coord: Coord,
    },

    #[error("{coord}: global `{name}` cannot have an initializer")]
    GlobalInitializer { name: String, coord: Coord },

    #[error("{coord}: global `{name}` is already declared")]
    GlobalRedeclared { name: String, coord: Coord },

    #[error("{coord}: function `{name}` is already defined")]
    FunctionRedeclared { name: String, coord: Coord },
}

/// Whole-program reference resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("in `{script}`: unresolved reference `{name}`")]
    UnresolvedReference { name: String, script: String },

    #[error("in `{script}` at {coord}: break or continue outside of a loop")]
    UnboundJump { script: String, coord: Coord },
}
