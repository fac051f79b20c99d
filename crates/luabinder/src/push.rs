//! Pushing a native return value back onto the interpreter stack

use crate::state::LuaState;
use crate::value::LightUserData;

/// A native return type.
///
/// `()` pushes nothing. Every other implementor pushes exactly one value;
/// multiple return values are not supported.
pub trait LuaReturn {
    /// How many values [`push`](LuaReturn::push) leaves on the stack
    const COUNT: usize;

    /// Push `self`, returning [`COUNT`](LuaReturn::COUNT)
    fn push<S: LuaState + ?Sized>(self, state: &mut S) -> usize;
}

/// Push a single result, returning how many values were pushed.
pub fn push_result<R: LuaReturn, S: LuaState + ?Sized>(state: &mut S, value: R) -> usize {
    value.push(state)
}

impl LuaReturn for () {
    const COUNT: usize = 0;

    fn push<S: LuaState + ?Sized>(self, _state: &mut S) -> usize {
        0
    }
}

macro_rules! impl_lua_return {
    ($($ty:ty => |$state:ident, $value:ident| $push:expr;)+) => {
        $(
            impl LuaReturn for $ty {
                const COUNT: usize = 1;

                #[inline]
                fn push<S: LuaState + ?Sized>(self, $state: &mut S) -> usize {
                    let $value = self;
                    $push;
                    1
                }
            }
        )+
    };
}

impl_lua_return! {
    i64 => |state, value| state.push_integer(value);
    i32 => |state, value| state.push_integer(i64::from(value));
    f64 => |state, value| state.push_number(value);
    f32 => |state, value| state.push_number(f64::from(value));
    bool => |state, value| state.push_boolean(value);
    String => |state, value| state.push_string(&value);
    &str => |state, value| state.push_string(value);
    LightUserData => |state, value| state.push_light_userdata(value.as_ptr());
}

// Pointers go out as light user data: no ownership transfer, no finalizer.
impl<T> LuaReturn for *mut T {
    const COUNT: usize = 1;

    fn push<S: LuaState + ?Sized>(self, state: &mut S) -> usize {
        state.push_light_userdata(self.cast());
        1
    }
}

impl<T> LuaReturn for *const T {
    const COUNT: usize = 1;

    fn push<S: LuaState + ?Sized>(self, state: &mut S) -> usize {
        state.push_light_userdata(self.cast_mut().cast());
        1
    }
}
