//! Per-type predicates deciding whether a stack slot fits a parameter

use crate::state::{LuaState, LuaType};
use crate::value::{FromLuaValue, LightUserData, LuaValue, ValueKind};

/// How strictly number slots are matched against float parameters.
///
/// Integer parameters never accept float-represented numbers. The policy
/// only decides whether float parameters accept integer-represented ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Coercion {
    /// Float parameters accept any number; integers are widened
    #[default]
    Lenient,

    /// Float parameters require a float-represented number
    Exact,
}

/// A native parameter type the binder can validate and extract.
pub trait LuaArg: FromLuaValue {
    /// Kind reported in type mismatch diagnostics
    const KIND: ValueKind;

    /// Whether the slot at `index` is compatible with `Self`
    fn check<S: LuaState + ?Sized>(state: &S, index: i32, coercion: Coercion) -> bool;

    /// Snapshot the slot and convert it
    fn read<S: LuaState + ?Sized>(state: &S, index: i32) -> Self {
        Self::from_lua_value(LuaValue::read(state, index))
    }
}

// ═══════════════════════════════════════════════════════════════════
// Predicate Table
// ═══════════════════════════════════════════════════════════════════

/// Integer-represented number
pub fn is_integer_slot<S: LuaState + ?Sized>(state: &S, index: i32) -> bool {
    state.type_at(index) == LuaType::Number && state.is_integer(index)
}

/// Any number, or only float-represented ones under [`Coercion::Exact`]
pub fn is_number_slot<S: LuaState + ?Sized>(state: &S, index: i32, coercion: Coercion) -> bool {
    match coercion {
        Coercion::Lenient => state.type_at(index) == LuaType::Number,
        Coercion::Exact => state.type_at(index) == LuaType::Number && !state.is_integer(index),
    }
}

/// UTF-8 strings, and numbers (which the interpreter converts to strings)
pub fn is_string_slot<S: LuaState + ?Sized>(state: &S, index: i32) -> bool {
    match state.type_at(index) {
        LuaType::Number => true,
        LuaType::String => state.is_utf8(index),
        _ => false,
    }
}

/// Booleans only; no truthiness
pub fn is_boolean_slot<S: LuaState + ?Sized>(state: &S, index: i32) -> bool {
    state.type_at(index) == LuaType::Boolean
}

/// Light or full user data
pub fn is_userdata_slot<S: LuaState + ?Sized>(state: &S, index: i32) -> bool {
    state.type_at(index).is_userdata()
}

macro_rules! impl_lua_arg {
    ($kind:expr, |$state:ident, $index:ident, $coercion:ident| $check:expr; $($ty:ty),+) => {
        $(
            impl LuaArg for $ty {
                const KIND: ValueKind = $kind;

                #[inline]
                fn check<S: LuaState + ?Sized>($state: &S, $index: i32, $coercion: Coercion) -> bool {
                    $check
                }
            }
        )+
    };
}

impl_lua_arg!(ValueKind::Integer, |state, index, _coercion| is_integer_slot(state, index); i64, i32);
impl_lua_arg!(ValueKind::FloatingPoint, |state, index, coercion| is_number_slot(state, index, coercion); f64, f32);
impl_lua_arg!(ValueKind::String, |state, index, _coercion| is_string_slot(state, index); String);
impl_lua_arg!(ValueKind::Boolean, |state, index, _coercion| is_boolean_slot(state, index); bool);
impl_lua_arg!(ValueKind::OpaqueHandle, |state, index, _coercion| is_userdata_slot(state, index); LightUserData);

impl<T> LuaArg for *mut T {
    const KIND: ValueKind = ValueKind::OpaqueHandle;

    fn check<S: LuaState + ?Sized>(state: &S, index: i32, _coercion: Coercion) -> bool {
        is_userdata_slot(state, index)
    }
}

impl<T> LuaArg for *const T {
    const KIND: ValueKind = ValueKind::OpaqueHandle;

    fn check<S: LuaState + ?Sized>(state: &S, index: i32, _coercion: Coercion) -> bool {
        is_userdata_slot(state, index)
    }
}
