//! Error types for binding calls

use thiserror::Error;

use crate::state::{LuaState, LuaType};
use crate::value::ValueKind;

/// Why a bound call produced no results.
///
/// These never reach the interpreter as raised errors. The trampoline logs
/// them and reports zero results; [`invoke`](crate::invoke) hands them to
/// host code so failures can be observed without scraping logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// Stack depth differs from the declared parameter count
    #[error("incorrect argument count: expected {expected}, got {got}")]
    ArityMismatch {
        /// Declared parameter count
        expected: usize,
        /// Values found on the stack
        got: usize,
    },

    /// A stack slot failed the predicate for its parameter
    #[error("incorrect argument type at position {position}: expected {expected}, got {got}")]
    TypeMismatch {
        /// 1-based stack index of the offending argument
        position: usize,
        /// Kind the native parameter requires
        expected: ValueKind,
        /// Dynamic type found in the slot
        got: LuaType,
    },

    /// A string argument holds bytes that are not valid UTF-8
    #[error("incorrect argument at position {position}: string is not valid UTF-8")]
    InvalidUtf8 {
        /// 1-based stack index of the offending argument
        position: usize,
    },
}

impl BindError {
    /// Create an arity mismatch error
    pub fn arity(expected: usize, got: usize) -> Self {
        BindError::ArityMismatch { expected, got }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(position: usize, expected: ValueKind, got: LuaType) -> Self {
        BindError::TypeMismatch {
            position,
            expected,
            got,
        }
    }

    /// Create an invalid UTF-8 error
    pub fn invalid_utf8(position: usize) -> Self {
        BindError::InvalidUtf8 { position }
    }

    /// Reject the slot at `index` for a parameter of kind `expected`
    pub(crate) fn rejected<S: LuaState + ?Sized>(state: &S, index: i32, expected: ValueKind) -> Self {
        let position = usize::try_from(index).unwrap_or(0);
        match state.type_at(index) {
            LuaType::String if expected == ValueKind::String => BindError::invalid_utf8(position),
            got => BindError::type_mismatch(position, expected, got),
        }
    }
}

/// Result type alias for binding operations
pub type Result<T> = std::result::Result<T, BindError>;
