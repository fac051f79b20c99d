//! # luabinder
//!
//! Expose native Rust functions to an embedded Lua interpreter without
//! hand-writing marshalling code.
//!
//! Given a function's signature, the binder generates at compile time an
//! entry point with the interpreter's native-call shape that checks the
//! argument count and types, converts each stack slot into the native
//! parameter type, calls the function and pushes its return value.
//!
//! ## Architecture
//!
//! - **State**: [`LuaState`], the slice of the embedding API the binder uses
//! - **Values**: [`LuaValue`], a tagged snapshot of one stack slot
//! - **Predicates**: [`LuaArg`], per-type slot compatibility checks
//! - **Arguments**: [`ArgList`], arity and left-to-right extraction
//! - **Results**: [`LuaReturn`], pushing at most one value back
//! - **Trampolines**: [`invoke`], [`dispatch`], [`trampoline!`] and the
//!   `#[lua_function]` attribute
//!
//! ## Example
//!
//! ```
//! use luabinder::memory::{MemoryState, Slot};
//! use luabinder::lua_function;
//!
//! #[lua_function]
//! fn add(a: i64, b: i64) -> i64 {
//!     a + b
//! }
//!
//! let mut state = MemoryState::with_slots([Slot::Integer(2), Slot::Integer(3)]);
//! assert_eq!(state.call(add_lua), vec![Slot::Integer(5)]);
//!
//! // Wrong types: the call yields nothing
//! let mut state = MemoryState::with_slots([Slot::string("2"), Slot::Integer(3)]);
//! assert!(state.call(add_lua).is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Lets `#[lua_function]` expansions resolve `::luabinder` inside this crate
extern crate self as luabinder;

pub mod args;
pub mod check;
pub mod error;
pub mod memory;
pub mod push;
#[cfg(feature = "lua54")]
pub mod raw;
pub mod state;
pub mod trampoline;
pub mod value;

// Re-export main types
pub use args::{check_args, pop_args, ArgList, Validated};
pub use check::{Coercion, LuaArg};
pub use error::{BindError, Result};
pub use push::{push_result, LuaReturn};
pub use state::{LuaState, LuaType};
pub use trampoline::{dispatch, invoke, NativeFn, Returned, Trampoline};
pub use value::{FromLuaValue, LightUserData, LuaValue, ValueKind};

#[cfg(feature = "macros")]
pub use luabinder_macros::lua_function;

/// luabinder version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
