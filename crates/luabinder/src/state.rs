//! The embedding-API surface the binder consumes
//!
//! The interpreter itself is an external collaborator. Everything the
//! binder needs from it fits in the [`LuaState`] trait: query a slot's
//! dynamic type, query the stack depth, read a slot, push a result.
//! Tables, functions and coroutines are never touched.

use std::ffi::c_void;
use std::fmt;

/// Dynamic type tag of an interpreter stack slot.
///
/// Discriminants match the interpreter's `LUA_T*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LuaType {
    /// Index past the top of the stack
    None = -1,
    /// `nil`
    Nil = 0,
    /// `true` or `false`
    Boolean = 1,
    /// Raw host address
    LightUserData = 2,
    /// Integer or float number
    Number = 3,
    /// Interned string
    String = 4,
    /// Table
    Table = 5,
    /// Script or native function
    Function = 6,
    /// Interpreter-allocated user data block
    UserData = 7,
    /// Coroutine
    Thread = 8,
}

impl LuaType {
    /// Map a raw `LUA_T*` tag. Unknown tags read as [`LuaType::None`].
    pub fn from_raw(tag: i32) -> Self {
        match tag {
            0 => LuaType::Nil,
            1 => LuaType::Boolean,
            2 => LuaType::LightUserData,
            3 => LuaType::Number,
            4 => LuaType::String,
            5 => LuaType::Table,
            6 => LuaType::Function,
            7 => LuaType::UserData,
            8 => LuaType::Thread,
            _ => LuaType::None,
        }
    }

    /// The name the interpreter's `type()` function reports
    pub fn name(self) -> &'static str {
        match self {
            LuaType::None => "no value",
            LuaType::Nil => "nil",
            LuaType::Boolean => "boolean",
            LuaType::LightUserData | LuaType::UserData => "userdata",
            LuaType::Number => "number",
            LuaType::String => "string",
            LuaType::Table => "table",
            LuaType::Function => "function",
            LuaType::Thread => "thread",
        }
    }

    /// Light or full user data
    pub fn is_userdata(self) -> bool {
        matches!(self, LuaType::LightUserData | LuaType::UserData)
    }
}

impl fmt::Display for LuaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Access to one interpreter call frame.
///
/// Indices are 1-based and count from the bottom of the frame, so the
/// first argument of a call lives at index 1 and `top()` is the argument
/// count on entry.
pub trait LuaState {
    /// Number of values in the frame
    fn top(&self) -> i32;

    /// Dynamic type of the slot at `index`
    fn type_at(&self, index: i32) -> LuaType;

    /// Whether the slot holds a number represented as an integer
    fn is_integer(&self, index: i32) -> bool;

    /// Read a boolean slot
    fn to_boolean(&self, index: i32) -> bool;

    /// Read an integer-represented number
    fn to_integer(&self, index: i32) -> i64;

    /// Read any number as a float
    fn to_number(&self, index: i32) -> f64;

    /// Copy a string slot out of interpreter storage.
    ///
    /// Numbers are converted to their `tostring` text. Returns `None` when
    /// the slot holds neither, or holds a byte string that is not valid
    /// UTF-8; bytes are never replaced.
    fn to_string(&self, index: i32) -> Option<String>;

    /// Whether the slot holds a string whose bytes are valid UTF-8
    fn is_utf8(&self, index: i32) -> bool {
        self.type_at(index) == LuaType::String && self.to_string(index).is_some()
    }

    /// Raw address of a light or full user data slot, null otherwise
    fn to_userdata(&self, index: i32) -> *mut c_void;

    /// Push a boolean
    fn push_boolean(&mut self, value: bool);

    /// Push an integer-represented number
    fn push_integer(&mut self, value: i64);

    /// Push a float-represented number
    fn push_number(&mut self, value: f64);

    /// Push a string by content
    fn push_string(&mut self, value: &str);

    /// Push a raw address as light user data. No finalizer is attached.
    fn push_light_userdata(&mut self, value: *mut c_void);
}

impl<S: LuaState + ?Sized> LuaState for &mut S {
    fn top(&self) -> i32 {
        (**self).top()
    }

    fn type_at(&self, index: i32) -> LuaType {
        (**self).type_at(index)
    }

    fn is_integer(&self, index: i32) -> bool {
        (**self).is_integer(index)
    }

    fn to_boolean(&self, index: i32) -> bool {
        (**self).to_boolean(index)
    }

    fn to_integer(&self, index: i32) -> i64 {
        (**self).to_integer(index)
    }

    fn to_number(&self, index: i32) -> f64 {
        (**self).to_number(index)
    }

    fn to_string(&self, index: i32) -> Option<String> {
        (**self).to_string(index)
    }

    fn is_utf8(&self, index: i32) -> bool {
        (**self).is_utf8(index)
    }

    fn to_userdata(&self, index: i32) -> *mut c_void {
        (**self).to_userdata(index)
    }

    fn push_boolean(&mut self, value: bool) {
        (**self).push_boolean(value)
    }

    fn push_integer(&mut self, value: i64) {
        (**self).push_integer(value)
    }

    fn push_number(&mut self, value: f64) {
        (**self).push_number(value)
    }

    fn push_string(&mut self, value: &str) {
        (**self).push_string(value)
    }

    fn push_light_userdata(&mut self, value: *mut c_void) {
        (**self).push_light_userdata(value)
    }
}
