//! Total conversions out of a [`LuaValue`]

use std::ffi::c_void;
use std::ptr;

use super::display::format_number;
use super::{LightUserData, LuaValue};

/// A native type that can be produced from any [`LuaValue`].
///
/// Conversion is total. When the value's kind does not match the requested
/// type the result is deterministic:
///
/// | requested      | matching kind | int/float        | anything else |
/// |----------------|---------------|------------------|---------------|
/// | integer        | value         | truncate to zero | `0`           |
/// | float          | value         | widen            | `0.0`         |
/// | `bool`         | value         | -                | `false`       |
/// | `String`       | copy          | number as text   | `""`          |
/// | pointer        | address       | -                | null          |
///
/// Callers are expected to have run the predicate table first; the
/// fallbacks only keep a skipped check from being memory-unsafe.
pub trait FromLuaValue: Sized {
    /// Convert, falling back to the documented zero value
    fn from_lua_value(value: LuaValue) -> Self;
}

impl FromLuaValue for LuaValue {
    fn from_lua_value(value: LuaValue) -> Self {
        value
    }
}

impl FromLuaValue for bool {
    fn from_lua_value(value: LuaValue) -> Self {
        match value {
            LuaValue::Boolean(b) => b,
            _ => false,
        }
    }
}

impl FromLuaValue for i64 {
    fn from_lua_value(value: LuaValue) -> Self {
        match value {
            LuaValue::Integer(n) => n,
            // `as` truncates toward zero and saturates; NaN becomes 0
            LuaValue::Number(n) => n as i64,
            _ => 0,
        }
    }
}

impl FromLuaValue for i32 {
    fn from_lua_value(value: LuaValue) -> Self {
        match value {
            LuaValue::Integer(n) => n as i32,
            LuaValue::Number(n) => n as i32,
            _ => 0,
        }
    }
}

impl FromLuaValue for f64 {
    fn from_lua_value(value: LuaValue) -> Self {
        match value {
            LuaValue::Number(n) => n,
            LuaValue::Integer(n) => n as f64,
            _ => 0.0,
        }
    }
}

impl FromLuaValue for f32 {
    fn from_lua_value(value: LuaValue) -> Self {
        f64::from_lua_value(value) as f32
    }
}

impl FromLuaValue for String {
    fn from_lua_value(value: LuaValue) -> Self {
        match value {
            LuaValue::String(s) => s,
            LuaValue::Integer(n) => n.to_string(),
            LuaValue::Number(n) => format_number(n),
            _ => String::new(),
        }
    }
}

impl FromLuaValue for LightUserData {
    fn from_lua_value(value: LuaValue) -> Self {
        match value {
            LuaValue::OpaqueHandle(p) => LightUserData(p),
            _ => LightUserData::null(),
        }
    }
}

// Pointer parameters are an unchecked reinterpretation of the stored
// address. Nothing is dereferenced here.
impl<T> FromLuaValue for *mut T {
    fn from_lua_value(value: LuaValue) -> Self {
        match value {
            LuaValue::OpaqueHandle(p) => p.cast::<T>(),
            _ => ptr::null_mut(),
        }
    }
}

impl<T> FromLuaValue for *const T {
    fn from_lua_value(value: LuaValue) -> Self {
        match value {
            LuaValue::OpaqueHandle(p) => p.cast_const().cast::<T>(),
            _ => ptr::null::<c_void>().cast::<T>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LuaType;

    #[test]
    fn test_int_from_float_truncates_toward_zero() {
        assert_eq!(LuaValue::Number(7.9).extract::<i64>(), 7);
        assert_eq!(LuaValue::Number(-7.9).extract::<i64>(), -7);
        assert_eq!(LuaValue::Number(f64::NAN).extract::<i64>(), 0);
        assert_eq!(LuaValue::Number(1e300).extract::<i64>(), i64::MAX);
    }

    #[test]
    fn test_float_from_int_widens() {
        assert_eq!(LuaValue::Integer(7).extract::<f64>(), 7.0);
        assert_eq!(LuaValue::Integer(-3).extract::<f32>(), -3.0);
    }

    #[test]
    fn test_i32_wraps() {
        assert_eq!(LuaValue::Integer(5).extract::<i32>(), 5);
        assert_eq!(LuaValue::Integer(1 << 32).extract::<i32>(), 0);
    }

    #[test]
    fn test_mismatched_kinds_yield_zero_values() {
        assert!(!LuaValue::Integer(1).extract::<bool>());
        assert_eq!(LuaValue::Boolean(true).extract::<i64>(), 0);
        assert_eq!(LuaValue::string("x").extract::<f64>(), 0.0);
        assert_eq!(LuaValue::Boolean(true).extract::<String>(), "");
        assert!(LuaValue::Integer(1).extract::<*mut u8>().is_null());
        assert!(LuaValue::Unsupported(LuaType::Table)
            .extract::<LightUserData>()
            .is_null());
    }

    #[test]
    fn test_numbers_as_strings() {
        assert_eq!(LuaValue::Integer(42).extract::<String>(), "42");
        assert_eq!(LuaValue::Number(7.0).extract::<String>(), "7.0");
        assert_eq!(LuaValue::Number(2.5).extract::<String>(), "2.5");
    }

    #[test]
    fn test_pointer_reinterpretation_keeps_address() {
        let mut target = 11u32;
        let addr = (&mut target as *mut u32).cast::<c_void>();
        let p: *mut u32 = LuaValue::OpaqueHandle(addr).extract();
        assert_eq!(p, &mut target as *mut u32);
        let c: *const u32 = LuaValue::OpaqueHandle(addr).extract();
        assert_eq!(c, &target as *const u32);
    }
}
