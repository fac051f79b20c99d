//! Lua 5.4 backend over the raw C API
//!
//! [`RawState`] implements [`LuaState`] for a `lua_State*` handed to a C
//! function, and [`lua_cfunction!`](crate::lua_cfunction!) turns a native
//! function into a `lua_CFunction` ready for `lua_register`.

use std::ffi::c_void;
use std::os::raw::c_int;
use std::ptr;
use std::slice;

pub use mlua_sys::{lua_CFunction, lua_State};

use crate::state::{LuaState, LuaType};
use crate::value::format_number;

/// A borrowed interpreter call frame.
#[derive(Debug)]
pub struct RawState {
    ptr: *mut lua_State,
}

impl RawState {
    /// Wrap the state pointer a C function was called with.
    ///
    /// # Safety
    ///
    /// `ptr` must be a live `lua_State` for as long as the returned value
    /// is used, and must not be used concurrently from another thread.
    pub unsafe fn from_ptr(ptr: *mut lua_State) -> Self {
        Self { ptr }
    }

    /// The wrapped pointer
    pub fn as_ptr(&self) -> *mut lua_State {
        self.ptr
    }

    /// Borrow the bytes of a string slot, embedded zeros included.
    ///
    /// The slice lives in interpreter storage and stays valid while the
    /// string is on the stack.
    pub fn string_bytes(&self, index: i32) -> Option<&[u8]> {
        if self.type_at(index) != LuaType::String {
            return None;
        }
        let mut len = 0usize;
        // SAFETY: the slot holds a string, so lua_tolstring neither converts
        // it nor raises
        let data = unsafe { mlua_sys::lua_tolstring(self.ptr, index, &mut len) };
        if data.is_null() {
            return None;
        }
        // SAFETY: Lua guarantees `len` readable bytes at `data`
        Some(unsafe { slice::from_raw_parts(data.cast::<u8>(), len) })
    }
}

// SAFETY (all methods below): `from_ptr` requires a live, unshared state.
// Every call stays within the documented stack-slot accessors, and none of
// them raises errors for in-range or out-of-range indices.
impl LuaState for RawState {
    fn top(&self) -> i32 {
        unsafe { mlua_sys::lua_gettop(self.ptr) }
    }

    fn type_at(&self, index: i32) -> LuaType {
        LuaType::from_raw(unsafe { mlua_sys::lua_type(self.ptr, index) })
    }

    fn is_integer(&self, index: i32) -> bool {
        unsafe { mlua_sys::lua_isinteger(self.ptr, index) != 0 }
    }

    fn to_boolean(&self, index: i32) -> bool {
        unsafe { mlua_sys::lua_toboolean(self.ptr, index) != 0 }
    }

    fn to_integer(&self, index: i32) -> i64 {
        unsafe { mlua_sys::lua_tointegerx(self.ptr, index, ptr::null_mut()) }
    }

    fn to_number(&self, index: i32) -> f64 {
        unsafe { mlua_sys::lua_tonumberx(self.ptr, index, ptr::null_mut()) }
    }

    fn to_string(&self, index: i32) -> Option<String> {
        match self.type_at(index) {
            LuaType::String => {
                let bytes = self.string_bytes(index)?;
                std::str::from_utf8(bytes).ok().map(str::to_owned)
            }
            // lua_tolstring would rewrite the slot in place; format instead
            LuaType::Number if self.is_integer(index) => Some(self.to_integer(index).to_string()),
            LuaType::Number => Some(format_number(self.to_number(index))),
            _ => None,
        }
    }

    fn is_utf8(&self, index: i32) -> bool {
        self.type_at(index) == LuaType::String
            && self
                .string_bytes(index)
                .is_some_and(|bytes| std::str::from_utf8(bytes).is_ok())
    }

    fn to_userdata(&self, index: i32) -> *mut c_void {
        unsafe { mlua_sys::lua_touserdata(self.ptr, index) }
    }

    fn push_boolean(&mut self, value: bool) {
        unsafe { mlua_sys::lua_pushboolean(self.ptr, c_int::from(value)) }
    }

    fn push_integer(&mut self, value: i64) {
        unsafe { mlua_sys::lua_pushinteger(self.ptr, value) }
    }

    fn push_number(&mut self, value: f64) {
        unsafe { mlua_sys::lua_pushnumber(self.ptr, value) }
    }

    fn push_string(&mut self, value: &str) {
        unsafe {
            mlua_sys::lua_pushlstring(self.ptr, value.as_ptr().cast(), value.len());
        }
    }

    fn push_light_userdata(&mut self, value: *mut c_void) {
        unsafe { mlua_sys::lua_pushlightuserdata(self.ptr, value) }
    }
}

/// Generate a `lua_CFunction` for a native function.
///
/// Same rules as [`trampoline!`](crate::trampoline!): `func` must be
/// nameable from the call site's module, and the optional policy must be a
/// constant.
#[macro_export]
macro_rules! lua_cfunction {
    ($func:expr) => {
        $crate::lua_cfunction!($func, $crate::Coercion::Lenient)
    };
    ($func:expr, $coercion:expr) => {{
        unsafe extern "C-unwind" fn __luabinder_cfunction(
            l: *mut $crate::raw::lua_State,
        ) -> ::std::os::raw::c_int {
            // SAFETY: the interpreter calls C functions with its live state
            let mut state = unsafe { $crate::raw::RawState::from_ptr(l) };
            $crate::dispatch(&mut state, $func, $coercion)
        }
        __luabinder_cfunction as $crate::raw::lua_CFunction
    }};
}
