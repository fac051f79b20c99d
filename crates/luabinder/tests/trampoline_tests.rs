//! End-to-end behavior of generated trampolines

use std::cell::Cell;
use std::ffi::c_void;

use luabinder::memory::{MemoryState, Slot};
use luabinder::*;
use pretty_assertions::assert_eq;

fn add(a: i64, b: i64) -> i64 {
    a + b
}

fn identity(x: f64) -> f64 {
    x
}

fn answer() -> i64 {
    42
}

fn shout(s: String) -> String {
    s.to_uppercase()
}

fn negate(b: bool) -> bool {
    !b
}

fn half(x: f32) -> f32 {
    x / 2.0
}

fn narrow(x: i32) -> i32 {
    x.wrapping_mul(2)
}

fn greeting() -> &'static str {
    "hello"
}

// ═══════════════════════════════════════════════════════════════════════
// Concrete scenarios
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_add_pushes_sum() {
    let mut state = MemoryState::with_slots([Slot::Integer(2), Slot::Integer(3)]);
    assert_eq!(state.call(trampoline!(add)), vec![Slot::Integer(5)]);
}

#[test]
fn test_add_rejects_string_argument() {
    let mut state = MemoryState::with_slots([Slot::string("2"), Slot::Integer(3)]);
    assert_eq!(state.call(trampoline!(add)), Vec::<Slot>::new());
}

#[test]
fn test_add_rejects_missing_argument() {
    let mut state = MemoryState::with_slots([Slot::Integer(3)]);
    assert_eq!(state.call(trampoline!(add)), Vec::<Slot>::new());
}

#[test]
fn test_identity_widens_integer() {
    let mut state = MemoryState::with_slots([Slot::Integer(7)]);
    assert_eq!(state.call(trampoline!(identity)), vec![Slot::Number(7.0)]);
}

thread_local! {
    static CALLS: Cell<u32> = const { Cell::new(0) };
}

fn tick() {
    CALLS.with(|c| c.set(c.get() + 1));
}

#[test]
fn test_void_function_runs_once() {
    CALLS.with(|c| c.set(0));
    let mut state = MemoryState::new();
    assert_eq!(state.call(trampoline!(tick)), Vec::<Slot>::new());
    assert_eq!(CALLS.with(Cell::get), 1);
}

// ═══════════════════════════════════════════════════════════════════════
// Arity
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_zero_arity_result() {
    let mut state = MemoryState::new();
    assert_eq!(state.call(trampoline!(answer)), vec![Slot::Integer(answer())]);
}

#[test]
fn test_zero_arity_rejects_arguments() {
    let mut state = MemoryState::with_slots([Slot::Nil]);
    assert_eq!(
        invoke(&mut state, answer, Coercion::Lenient),
        Err(BindError::arity(0, 1))
    );
}

#[test]
fn test_too_many_arguments() {
    let mut state =
        MemoryState::with_slots([Slot::Integer(1), Slot::Integer(2), Slot::Integer(3)]);
    assert_eq!(
        invoke(&mut state, add, Coercion::Lenient),
        Err(BindError::arity(2, 3))
    );
}

#[test]
fn test_mismatched_void_function_not_called() {
    CALLS.with(|c| c.set(0));
    let mut state = MemoryState::with_slots([Slot::Integer(1)]);
    assert_eq!(state.call(trampoline!(tick)), Vec::<Slot>::new());
    assert_eq!(CALLS.with(Cell::get), 0);
}

// ═══════════════════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_each_kind_roundtrips() {
    let mut state = MemoryState::with_slots([Slot::string("quiet")]);
    assert_eq!(state.call(trampoline!(shout)), vec![Slot::string("QUIET")]);

    let mut state = MemoryState::with_slots([Slot::Boolean(false)]);
    assert_eq!(state.call(trampoline!(negate)), vec![Slot::Boolean(true)]);

    let mut state = MemoryState::with_slots([Slot::Number(3.0)]);
    assert_eq!(state.call(trampoline!(half)), vec![Slot::Number(1.5)]);

    let mut state = MemoryState::with_slots([Slot::Integer(21)]);
    assert_eq!(state.call(trampoline!(narrow)), vec![Slot::Integer(42)]);

    let mut state = MemoryState::new();
    assert_eq!(state.call(trampoline!(greeting)), vec![Slot::string("hello")]);
}

#[test]
fn test_string_parameter_accepts_numbers() {
    let mut state = MemoryState::with_slots([Slot::Integer(12)]);
    assert_eq!(state.call(trampoline!(shout)), vec![Slot::string("12")]);

    let mut state = MemoryState::with_slots([Slot::Number(1.5)]);
    assert_eq!(state.call(trampoline!(shout)), vec![Slot::string("1.5")]);
}

#[test]
fn test_string_parameter_sees_tostring_text() {
    let cases = [
        (1.0 / 3.0, "0.33333333333333"),
        (0.1 + 0.2, "0.3"),
        (1e15, "1E+15"),
        (1e100, "1E+100"),
        (8.0, "8.0"),
    ];
    for (n, text) in cases {
        let mut state = MemoryState::with_slots([Slot::Number(n)]);
        assert_eq!(state.call(trampoline!(shout)), vec![Slot::string(text)]);
    }
}

#[test]
fn test_integer_parameter_rejects_float() {
    let mut state = MemoryState::with_slots([Slot::Number(2.0), Slot::Integer(3)]);
    assert_eq!(
        invoke(&mut state, add, Coercion::Lenient),
        Err(BindError::type_mismatch(1, ValueKind::Integer, LuaType::Number))
    );
}

#[test]
fn test_boolean_parameter_has_no_truthiness() {
    for slot in [Slot::Nil, Slot::Integer(1), Slot::string("true")] {
        let mut state = MemoryState::with_slots([slot]);
        assert_eq!(state.call(trampoline!(negate)), Vec::<Slot>::new());
    }
}

#[test]
fn test_unsupported_kinds_rejected() {
    for slot in [Slot::Nil, Slot::Table, Slot::Function] {
        let mut state = MemoryState::with_slots([slot, Slot::Integer(1)]);
        assert_eq!(state.call(trampoline!(add)), Vec::<Slot>::new());
    }
}

#[test]
fn test_second_position_reported() {
    let mut state = MemoryState::with_slots([Slot::Integer(1), Slot::Boolean(true)]);
    assert_eq!(
        invoke(&mut state, add, Coercion::Lenient),
        Err(BindError::type_mismatch(2, ValueKind::Integer, LuaType::Boolean))
    );
}

#[test]
fn test_exact_coercion_rejects_integer_for_float() {
    let mut state = MemoryState::with_slots([Slot::Integer(7)]);
    assert_eq!(state.call(trampoline!(identity, Coercion::Exact)), Vec::<Slot>::new());

    let mut state = MemoryState::with_slots([Slot::Number(7.5)]);
    assert_eq!(
        state.call(trampoline!(identity, Coercion::Exact)),
        vec![Slot::Number(7.5)]
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Opaque handles
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, PartialEq)]
struct Counter {
    hits: u32,
}

fn bump(counter: *mut Counter) -> i64 {
    // SAFETY: tests only pass live `Counter` addresses
    let counter = unsafe { &mut *counter };
    counter.hits += 1;
    i64::from(counter.hits)
}

fn passthrough(handle: LightUserData) -> LightUserData {
    handle
}

fn peek(bytes: *const u8) -> i64 {
    // SAFETY: tests only pass live user data blocks
    i64::from(unsafe { *bytes })
}

#[test]
fn test_pointer_argument_reaches_host_object() {
    let mut counter = Counter { hits: 0 };
    let addr = (&mut counter as *mut Counter).cast::<c_void>();

    let mut state = MemoryState::with_slots([Slot::LightUserData(addr)]);
    assert_eq!(state.call(trampoline!(bump)), vec![Slot::Integer(1)]);
    let mut state = MemoryState::with_slots([Slot::LightUserData(addr)]);
    assert_eq!(state.call(trampoline!(bump)), vec![Slot::Integer(2)]);

    assert_eq!(counter, Counter { hits: 2 });
}

#[test]
fn test_full_userdata_accepted_as_pointer() {
    let mut state = MemoryState::new();
    let addr = state.push_userdata(4);
    // SAFETY: the block is four zeroed bytes owned by `state`
    unsafe { *addr.cast::<u8>() = 9 };
    assert_eq!(state.call(trampoline!(peek)), vec![Slot::Integer(9)]);
}

#[test]
fn test_handle_passes_through_unchanged() {
    let mut target = 0u8;
    let handle = LightUserData::from_ptr(&mut target as *mut u8);
    let mut state = MemoryState::with_slots([Slot::from(handle)]);
    assert_eq!(
        state.call(trampoline!(passthrough)),
        vec![Slot::LightUserData(handle.as_ptr())]
    );
}

#[test]
fn test_pointer_parameter_rejects_non_userdata() {
    let mut state = MemoryState::with_slots([Slot::Integer(0)]);
    assert_eq!(state.call(trampoline!(bump)), Vec::<Slot>::new());
}

// ═══════════════════════════════════════════════════════════════════════
// Idempotence and sharing
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_repeated_calls_are_identical() {
    let entry: Trampoline<MemoryState> = trampoline!(add);
    let args = [Slot::Integer(10), Slot::Integer(-4)];

    let first = MemoryState::with_slots(args.clone()).call(entry);
    let second = MemoryState::with_slots(args).call(entry);
    assert_eq!(first, second);
    assert_eq!(first, vec![Slot::Integer(6)]);
}

#[test]
fn test_same_entry_under_several_names() {
    let entry: Trampoline<MemoryState> = trampoline!(add);
    let globals: Vec<(&str, Trampoline<MemoryState>)> = vec![("add", entry), ("plus", entry)];

    for (_, entry) in &globals {
        let mut state = MemoryState::with_slots([Slot::Integer(1), Slot::Integer(1)]);
        assert_eq!(state.call(entry), vec![Slot::Integer(2)]);
    }
}

#[test]
fn test_invoke_leaves_arguments_below_result() {
    let mut state = MemoryState::with_slots([Slot::Integer(2), Slot::Integer(3)]);
    let returned = invoke(&mut state, add, Coercion::Lenient).expect("valid call");
    assert_eq!(returned.count(), 1);
    assert_eq!(
        state.slots(),
        &[Slot::Integer(2), Slot::Integer(3), Slot::Integer(5)]
    );
}
