//! Trampolines: interpreter-callable entry points for native functions
//!
//! A trampoline runs five steps, to completion, on every call:
//!
//! 1. arity check against the native parameter count
//! 2. per-slot type check (skipped for empty parameter lists)
//! 3. argument extraction into a tuple
//! 4. the native call
//! 5. pushing the return value, if any
//!
//! Failures in steps 1 and 2 never raise inside the interpreter. They are
//! logged and the call reports zero results.
//!
//! Each entry point is a distinct monomorphized function specialized to one
//! native function item, so dispatch is direct and allocation-free. Use
//! [`trampoline!`](crate::trampoline!) for existing functions or the
//! `#[lua_function]` attribute on your own.

use std::os::raw::c_int;

use crate::args::{check_args, pop_args, ArgList};
use crate::check::Coercion;
use crate::error::{BindError, Result};
use crate::push::LuaReturn;
use crate::state::LuaState;

/// The interpreter-facing shape of a generated entry point.
pub type Trampoline<S> = fn(&mut S) -> c_int;

/// A native function callable with the argument tuple `A`.
///
/// Implemented for every `Fn` of up to twelve [`LuaArg`](crate::LuaArg)
/// parameters returning a [`LuaReturn`].
pub trait NativeFn<A: ArgList> {
    /// Native return type
    type Output: LuaReturn;

    /// Spread the tuple into a call
    fn call_with(&self, args: A) -> Self::Output;
}

macro_rules! impl_native_fn {
    ($($ty:ident),*; $($i:tt),*) => {
        impl<F, R $(, $ty)*> NativeFn<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> R,
            R: LuaReturn,
            $($ty: crate::check::LuaArg,)*
        {
            type Output = R;

            #[allow(unused_variables)]
            #[inline(always)]
            fn call_with(&self, args: ($($ty,)*)) -> R {
                self($(args.$i),*)
            }
        }
    };
}

impl_native_fn!(; );
impl_native_fn!(T0; 0);
impl_native_fn!(T0, T1; 0, 1);
impl_native_fn!(T0, T1, T2; 0, 1, 2);
impl_native_fn!(T0, T1, T2, T3; 0, 1, 2, 3);
impl_native_fn!(T0, T1, T2, T3, T4; 0, 1, 2, 3, 4);
impl_native_fn!(T0, T1, T2, T3, T4, T5; 0, 1, 2, 3, 4, 5);
impl_native_fn!(T0, T1, T2, T3, T4, T5, T6; 0, 1, 2, 3, 4, 5, 6);
impl_native_fn!(T0, T1, T2, T3, T4, T5, T6, T7; 0, 1, 2, 3, 4, 5, 6, 7);
impl_native_fn!(T0, T1, T2, T3, T4, T5, T6, T7, T8; 0, 1, 2, 3, 4, 5, 6, 7, 8);
impl_native_fn!(T0, T1, T2, T3, T4, T5, T6, T7, T8, T9; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9);
impl_native_fn!(T0, T1, T2, T3, T4, T5, T6, T7, T8, T9, T10;
                0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10);
impl_native_fn!(T0, T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11;
                0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11);

/// Outcome of a successful bound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Returned(usize);

impl Returned {
    /// Values pushed onto the stack: 0 for `()` returns, 1 otherwise
    pub fn count(self) -> usize {
        self.0
    }

    /// The count as the interpreter expects it
    pub fn as_c_int(self) -> c_int {
        // At most one value is ever pushed
        self.0 as c_int
    }
}

/// Run the full trampoline sequence and report the outcome.
///
/// This is the observable form of a bound call: host code and tests get
/// the failure reason instead of a bare zero.
///
/// # Errors
///
/// Returns `ArityMismatch` or `TypeMismatch` without calling `func`.
pub fn invoke<S, F, A>(state: &mut S, func: F, coercion: Coercion) -> Result<Returned>
where
    S: LuaState + ?Sized,
    F: NativeFn<A>,
    A: ArgList,
{
    let proof = check_args::<A, S>(state, coercion)?;
    let args = pop_args(state, proof);
    let count = func.call_with(args).push(state);
    tracing::trace!(arity = A::ARITY, results = count, "bound call completed");
    Ok(Returned(count))
}

/// Run the trampoline sequence and report a result count to the
/// interpreter, logging any failure.
pub fn dispatch<S, F, A>(state: &mut S, func: F, coercion: Coercion) -> c_int
where
    S: LuaState + ?Sized,
    F: NativeFn<A>,
    A: ArgList,
{
    match invoke(state, func, coercion) {
        Ok(returned) => returned.as_c_int(),
        Err(err) => {
            report(&err);
            0
        }
    }
}

fn report(err: &BindError) {
    match err {
        BindError::ArityMismatch { expected, got } => {
            tracing::warn!(expected, got, "incorrect argument count");
        }
        BindError::TypeMismatch {
            position,
            expected,
            got,
        } => {
            tracing::warn!(position, expected = %expected, got = %got, "incorrect argument type");
        }
        BindError::InvalidUtf8 { position } => {
            tracing::warn!(position, "string argument is not valid UTF-8");
        }
    }
}

/// Generate an entry point for a native function.
///
/// Expands to a function item generic over the [`LuaState`] it is called
/// with, specialized to `func`. The function must be nameable from the
/// call site's module (a path or a non-capturing closure). An optional
/// second argument selects the [`Coercion`] policy and must be a constant.
///
/// # Example
///
/// ```
/// use luabinder::memory::{MemoryState, Slot};
/// use luabinder::{trampoline, Coercion};
///
/// fn add(a: i64, b: i64) -> i64 {
///     a + b
/// }
///
/// let mut state = MemoryState::with_slots([Slot::Integer(2), Slot::Integer(3)]);
/// assert_eq!(state.call(trampoline!(add)), vec![Slot::Integer(5)]);
///
/// let mut state = MemoryState::with_slots([Slot::Integer(4)]);
/// assert_eq!(state.call(trampoline!(f64::sqrt, Coercion::Exact)), Vec::<Slot>::new());
/// ```
#[macro_export]
macro_rules! trampoline {
    ($func:expr) => {
        $crate::trampoline!($func, $crate::Coercion::Lenient)
    };
    ($func:expr, $coercion:expr) => {{
        fn __luabinder_entry<S: $crate::LuaState + ?Sized>(
            state: &mut S,
        ) -> ::std::os::raw::c_int {
            $crate::dispatch(state, $func, $coercion)
        }
        __luabinder_entry
    }};
}
