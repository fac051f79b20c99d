//! Tagged snapshot of a single interpreter stack slot

mod display;
mod extract;
mod handle;

pub(crate) use display::format_number;
pub use extract::FromLuaValue;
pub use handle::LightUserData;

use std::ffi::c_void;

use crate::state::{LuaState, LuaType};

/// The closed set of value kinds the binder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `true` or `false`
    Boolean,
    /// Number represented as an integer
    Integer,
    /// Number represented as a float
    FloatingPoint,
    /// Byte string copied out of the interpreter
    String,
    /// Light or full user data, observed by address
    OpaqueHandle,
    /// Anything else: nil, tables, functions, threads
    Unsupported,
}

/// One interpreter stack slot, read once and owned by the caller.
///
/// Strings are copied out of interpreter storage. Opaque handles are raw,
/// non-owning addresses; whoever created them keeps ownership.
#[derive(Debug, Clone, PartialEq)]
pub enum LuaValue {
    /// Boolean slot
    Boolean(bool),

    /// Integer-represented number
    Integer(i64),

    /// Float-represented number
    Number(f64),

    /// String slot (copied)
    String(String),

    /// Light or full user data address
    OpaqueHandle(*mut c_void),

    /// A slot of a type outside the closed kind set. Carries no payload,
    /// only the tag it was read from.
    Unsupported(LuaType),
}

impl LuaValue {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        LuaValue::String(s.into())
    }

    /// Snapshot the slot at `index`.
    ///
    /// Slots outside the closed kind set produce [`LuaValue::Unsupported`]
    /// and a warning; extracting from such a value yields the requested
    /// type's zero value.
    pub fn read<S: LuaState + ?Sized>(state: &S, index: i32) -> Self {
        match state.type_at(index) {
            LuaType::Boolean => LuaValue::Boolean(state.to_boolean(index)),
            LuaType::Number => {
                if state.is_integer(index) {
                    LuaValue::Integer(state.to_integer(index))
                } else {
                    LuaValue::Number(state.to_number(index))
                }
            }
            LuaType::String => match state.to_string(index) {
                Some(s) => LuaValue::String(s),
                None => {
                    tracing::warn!(index, "string is not valid UTF-8");
                    LuaValue::Unsupported(LuaType::String)
                }
            },
            LuaType::LightUserData | LuaType::UserData => {
                LuaValue::OpaqueHandle(state.to_userdata(index))
            }
            other => {
                tracing::warn!(index, got = %other, "type not supported by binder");
                LuaValue::Unsupported(other)
            }
        }
    }

    /// Which union member is live
    pub fn kind(&self) -> ValueKind {
        match self {
            LuaValue::Boolean(_) => ValueKind::Boolean,
            LuaValue::Integer(_) => ValueKind::Integer,
            LuaValue::Number(_) => ValueKind::FloatingPoint,
            LuaValue::String(_) => ValueKind::String,
            LuaValue::OpaqueHandle(_) => ValueKind::OpaqueHandle,
            LuaValue::Unsupported(_) => ValueKind::Unsupported,
        }
    }

    /// Convert the payload into `T`.
    ///
    /// Never fails. Integer and float payloads convert into each other
    /// (truncating toward zero, or widening); every other mismatch yields
    /// the zero value documented on [`FromLuaValue`].
    pub fn extract<T: FromLuaValue>(self) -> T {
        T::from_lua_value(self)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type Predicates
    // ═══════════════════════════════════════════════════════════════════

    /// Check if value is a boolean
    pub fn is_boolean(&self) -> bool {
        matches!(self, LuaValue::Boolean(_))
    }

    /// Check if value is an integer-represented number
    pub fn is_integer(&self) -> bool {
        matches!(self, LuaValue::Integer(_))
    }

    /// Check if value is any number
    pub fn is_number(&self) -> bool {
        matches!(self, LuaValue::Integer(_) | LuaValue::Number(_))
    }

    /// Check if value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, LuaValue::String(_))
    }

    /// Check if value is an opaque handle
    pub fn is_opaque(&self) -> bool {
        matches!(self, LuaValue::OpaqueHandle(_))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Extractors (exact kind only)
    // ═══════════════════════════════════════════════════════════════════

    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LuaValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract integer value
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            LuaValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract any number as f64
    pub fn as_number(&self) -> Option<f64> {
        match self {
            LuaValue::Integer(n) => Some(*n as f64),
            LuaValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LuaValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract opaque address
    pub fn as_ptr(&self) -> Option<*mut c_void> {
        match self {
            LuaValue::OpaqueHandle(p) => Some(*p),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<bool> for LuaValue {
    fn from(b: bool) -> Self {
        LuaValue::Boolean(b)
    }
}

impl From<i64> for LuaValue {
    fn from(n: i64) -> Self {
        LuaValue::Integer(n)
    }
}

impl From<f64> for LuaValue {
    fn from(n: f64) -> Self {
        LuaValue::Number(n)
    }
}

impl From<&str> for LuaValue {
    fn from(s: &str) -> Self {
        LuaValue::String(s.to_string())
    }
}

impl From<String> for LuaValue {
    fn from(s: String) -> Self {
        LuaValue::String(s)
    }
}

impl From<LightUserData> for LuaValue {
    fn from(ud: LightUserData) -> Self {
        LuaValue::OpaqueHandle(ud.as_ptr())
    }
}
