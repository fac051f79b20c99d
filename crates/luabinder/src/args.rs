//! Argument lists: arity, composite type check, extraction
//!
//! A native function's parameter list is a tuple of [`LuaArg`] types.
//! [`check_args`] validates the whole stack frame against it and hands
//! back a [`Validated`] token; [`pop_args`] only accepts that token, so the
//! trampoline cannot extract before it has checked.

use std::fmt;
use std::marker::PhantomData;

use crate::check::{Coercion, LuaArg};
use crate::error::{BindError, Result};
use crate::state::LuaState;

mod sealed {
    pub trait Sealed {}
}

/// An ordered, fixed-length parameter list.
///
/// Implemented for tuples of up to twelve [`LuaArg`] types, including the
/// empty tuple. Sealed.
pub trait ArgList: sealed::Sealed + Sized {
    /// Number of parameters
    const ARITY: usize;

    /// Check slots `start..start + ARITY` left to right, stopping at the
    /// first mismatch
    fn check_slots<S: LuaState + ?Sized>(state: &S, start: i32, coercion: Coercion) -> Result<()>;

    /// Read slots `start..start + ARITY` left to right
    #[doc(hidden)]
    fn read_slots<S: LuaState + ?Sized>(state: &S, start: i32) -> Self;
}

/// Proof that the current frame matched `A` in arity and types.
///
/// Only [`check_args`] constructs one.
pub struct Validated<A> {
    _args: PhantomData<fn() -> A>,
}

impl<A> fmt::Debug for Validated<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validated")
    }
}

/// Validate the whole frame against `A`.
///
/// # Errors
///
/// Returns `ArityMismatch` if the stack depth is not `A::ARITY`.
/// Returns `TypeMismatch` for the first slot failing its predicate.
pub fn check_args<A, S>(state: &S, coercion: Coercion) -> Result<Validated<A>>
where
    A: ArgList,
    S: LuaState + ?Sized,
{
    let got = usize::try_from(state.top()).unwrap_or(0);
    if got != A::ARITY {
        return Err(BindError::arity(A::ARITY, got));
    }
    if A::ARITY > 0 {
        A::check_slots(state, 1, coercion)?;
    }
    Ok(Validated { _args: PhantomData })
}

/// Build the argument tuple from a validated frame.
pub fn pop_args<A, S>(state: &S, _proof: Validated<A>) -> A
where
    A: ArgList,
    S: LuaState + ?Sized,
{
    A::read_slots(state, 1)
}

macro_rules! impl_arg_list {
    ($arity:literal; $($ty:ident),*; $($offset:literal),*) => {
        impl<$($ty: LuaArg),*> sealed::Sealed for ($($ty,)*) {}

        impl<$($ty: LuaArg),*> ArgList for ($($ty,)*) {
            const ARITY: usize = $arity;

            #[allow(unused_variables)]
            fn check_slots<S: LuaState + ?Sized>(
                state: &S,
                start: i32,
                coercion: Coercion,
            ) -> Result<()> {
                $(
                    let index = start + $offset;
                    if !$ty::check(state, index, coercion) {
                        return Err(BindError::rejected(state, index, $ty::KIND));
                    }
                )*
                Ok(())
            }

            #[allow(unused_variables, clippy::unused_unit)]
            fn read_slots<S: LuaState + ?Sized>(state: &S, start: i32) -> Self {
                ($($ty::read(state, start + $offset),)*)
            }
        }
    };
}

impl_arg_list!(0; ; );
impl_arg_list!(1; T0; 0);
impl_arg_list!(2; T0, T1; 0, 1);
impl_arg_list!(3; T0, T1, T2; 0, 1, 2);
impl_arg_list!(4; T0, T1, T2, T3; 0, 1, 2, 3);
impl_arg_list!(5; T0, T1, T2, T3, T4; 0, 1, 2, 3, 4);
impl_arg_list!(6; T0, T1, T2, T3, T4, T5; 0, 1, 2, 3, 4, 5);
impl_arg_list!(7; T0, T1, T2, T3, T4, T5, T6; 0, 1, 2, 3, 4, 5, 6);
impl_arg_list!(8; T0, T1, T2, T3, T4, T5, T6, T7; 0, 1, 2, 3, 4, 5, 6, 7);
impl_arg_list!(9; T0, T1, T2, T3, T4, T5, T6, T7, T8; 0, 1, 2, 3, 4, 5, 6, 7, 8);
impl_arg_list!(10; T0, T1, T2, T3, T4, T5, T6, T7, T8, T9; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9);
impl_arg_list!(11; T0, T1, T2, T3, T4, T5, T6, T7, T8, T9, T10;
               0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10);
impl_arg_list!(12; T0, T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11;
               0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11);
