//! An in-process interpreter stack
//!
//! [`MemoryState`] implements [`LuaState`] over a plain `Vec`, following the
//! interpreter's conventions for indexing and conversions. Hosts without a
//! linked interpreter can drive trampolines through it, and it is what the
//! test suite runs against.

use std::ffi::c_void;
use std::fmt;
use std::os::raw::c_int;
use std::ptr::{self, NonNull};
use std::slice;

use crate::state::{LuaState, LuaType};
use crate::value::{format_number, LightUserData};

/// One stack slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// `nil`
    Nil,
    /// Boolean
    Boolean(bool),
    /// Integer-represented number
    Integer(i64),
    /// Float-represented number
    Number(f64),
    /// String
    String(String),
    /// Table placeholder; contents are never inspected by the binder
    Table,
    /// Function placeholder
    Function,
    /// Raw host address
    LightUserData(*mut c_void),
    /// Interpreter-owned user data block
    UserData(UserDataBlock),
}

impl Slot {
    /// Create a string slot
    pub fn string(s: impl Into<String>) -> Self {
        Slot::String(s.into())
    }

    /// Dynamic type tag
    pub fn type_of(&self) -> LuaType {
        match self {
            Slot::Nil => LuaType::Nil,
            Slot::Boolean(_) => LuaType::Boolean,
            Slot::Integer(_) | Slot::Number(_) => LuaType::Number,
            Slot::String(_) => LuaType::String,
            Slot::Table => LuaType::Table,
            Slot::Function => LuaType::Function,
            Slot::LightUserData(_) => LuaType::LightUserData,
            Slot::UserData(_) => LuaType::UserData,
        }
    }
}

impl From<bool> for Slot {
    fn from(b: bool) -> Self {
        Slot::Boolean(b)
    }
}

impl From<i64> for Slot {
    fn from(n: i64) -> Self {
        Slot::Integer(n)
    }
}

impl From<f64> for Slot {
    fn from(n: f64) -> Self {
        Slot::Number(n)
    }
}

impl From<&str> for Slot {
    fn from(s: &str) -> Self {
        Slot::String(s.to_string())
    }
}

impl From<LightUserData> for Slot {
    fn from(ud: LightUserData) -> Self {
        Slot::LightUserData(ud.as_ptr())
    }
}

/// A zeroed byte block standing in for full user data.
///
/// The block is allocated once and only reached through the raw pointer it
/// was allocated as, so its address is stable and writable for as long as
/// the block lives. Cloning copies the bytes into a new block.
pub struct UserDataBlock {
    ptr: NonNull<[u8]>,
}

impl UserDataBlock {
    /// Allocate `size` zeroed bytes
    pub fn zeroed(size: usize) -> Self {
        let raw = Box::into_raw(vec![0u8; size].into_boxed_slice());
        Self {
            // SAFETY: Box::into_raw never returns null
            ptr: unsafe { NonNull::new_unchecked(raw) },
        }
    }

    /// Address of the first byte
    pub fn as_ptr(&self) -> *mut c_void {
        self.ptr.as_ptr().cast()
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.ptr.len()
    }

    /// Check for a zero-sized block
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current contents
    pub fn to_vec(&self) -> Vec<u8> {
        // SAFETY: the allocation is live and `len` bytes long; the copy
        // happens under `&self`, so no writer runs concurrently
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast::<u8>(), self.len()) }.to_vec()
    }
}

impl Clone for UserDataBlock {
    fn clone(&self) -> Self {
        let raw = Box::into_raw(self.to_vec().into_boxed_slice());
        Self {
            // SAFETY: Box::into_raw never returns null
            ptr: unsafe { NonNull::new_unchecked(raw) },
        }
    }
}

impl Drop for UserDataBlock {
    fn drop(&mut self) {
        // SAFETY: `ptr` came from Box::into_raw and is freed exactly once
        drop(unsafe { Box::from_raw(self.ptr.as_ptr()) });
    }
}

impl PartialEq for UserDataBlock {
    fn eq(&self, other: &Self) -> bool {
        self.to_vec() == other.to_vec()
    }
}

impl fmt::Debug for UserDataBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDataBlock")
            .field("addr", &self.as_ptr())
            .field("len", &self.len())
            .finish()
    }
}

/// A single call frame held in memory.
///
/// # Example
///
/// ```
/// use luabinder::memory::{MemoryState, Slot};
/// use luabinder::LuaState;
///
/// let mut state = MemoryState::with_slots([Slot::Integer(2), Slot::string("x")]);
/// assert_eq!(state.top(), 2);
/// assert_eq!(state.to_string(1).as_deref(), Some("2"));
///
/// state.push_boolean(true);
/// assert_eq!(state.slot(-1), Some(&Slot::Boolean(true)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    /// Bottom of the frame first
    slots: Vec<Slot>,
}

impl MemoryState {
    /// Create an empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frame holding `slots` as call arguments
    pub fn with_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        Self {
            slots: slots.into_iter().collect(),
        }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check for an empty frame
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop every slot
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// All slots, bottom first
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Push an arbitrary slot
    pub fn push_slot(&mut self, slot: impl Into<Slot>) {
        self.slots.push(slot.into());
    }

    /// Push `nil`
    pub fn push_nil(&mut self) {
        self.slots.push(Slot::Nil);
    }

    /// Push an empty table placeholder
    pub fn push_table(&mut self) {
        self.slots.push(Slot::Table);
    }

    /// Push a function placeholder
    pub fn push_function(&mut self) {
        self.slots.push(Slot::Function);
    }

    /// Allocate a zeroed user data block of `size` bytes, push it, and
    /// return its address
    pub fn push_userdata(&mut self, size: usize) -> *mut c_void {
        let block = UserDataBlock::zeroed(size);
        let addr = block.as_ptr();
        self.slots.push(Slot::UserData(block));
        addr
    }

    /// Slot at an interpreter index.
    ///
    /// Positive indices count from the bottom (1 is the first argument),
    /// negative ones from the top (-1 is the topmost value).
    pub fn slot(&self, index: i32) -> Option<&Slot> {
        let len = self.slots.len() as i64;
        let index = i64::from(index);
        let position = match index {
            i if i > 0 && i <= len => i - 1,
            i if i < 0 && -i <= len => len + i,
            _ => return None,
        };
        self.slots.get(position as usize)
    }

    /// Run a trampoline the way the interpreter does.
    ///
    /// The current slots are the call's arguments. After the call the frame
    /// is discarded and the top `n` values, `n` being the trampoline's
    /// reported result count, are returned bottom first.
    pub fn call<F>(&mut self, entry: F) -> Vec<Slot>
    where
        F: FnOnce(&mut MemoryState) -> c_int,
    {
        let reported = entry(self);
        let count = usize::try_from(reported).unwrap_or(0).min(self.slots.len());
        let results = self.slots.split_off(self.slots.len() - count);
        self.slots.clear();
        results
    }
}

impl LuaState for MemoryState {
    fn top(&self) -> i32 {
        i32::try_from(self.slots.len()).unwrap_or(i32::MAX)
    }

    fn type_at(&self, index: i32) -> LuaType {
        self.slot(index).map_or(LuaType::None, Slot::type_of)
    }

    fn is_integer(&self, index: i32) -> bool {
        matches!(self.slot(index), Some(Slot::Integer(_)))
    }

    fn to_boolean(&self, index: i32) -> bool {
        !matches!(self.slot(index), None | Some(Slot::Nil) | Some(Slot::Boolean(false)))
    }

    fn to_integer(&self, index: i32) -> i64 {
        match self.slot(index) {
            Some(Slot::Integer(n)) => *n,
            Some(Slot::Number(n)) if n.fract() == 0.0 => *n as i64,
            Some(Slot::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    fn to_number(&self, index: i32) -> f64 {
        match self.slot(index) {
            Some(Slot::Integer(n)) => *n as f64,
            Some(Slot::Number(n)) => *n,
            Some(Slot::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    fn to_string(&self, index: i32) -> Option<String> {
        match self.slot(index)? {
            Slot::String(s) => Some(s.clone()),
            Slot::Integer(n) => Some(n.to_string()),
            Slot::Number(n) => Some(format_number(*n)),
            _ => None,
        }
    }

    fn to_userdata(&self, index: i32) -> *mut c_void {
        match self.slot(index) {
            Some(Slot::LightUserData(p)) => *p,
            Some(Slot::UserData(block)) => block.as_ptr(),
            _ => ptr::null_mut(),
        }
    }

    fn push_boolean(&mut self, value: bool) {
        self.slots.push(Slot::Boolean(value));
    }

    fn push_integer(&mut self, value: i64) {
        self.slots.push(Slot::Integer(value));
    }

    fn push_number(&mut self, value: f64) {
        self.slots.push(Slot::Number(value));
    }

    fn push_string(&mut self, value: &str) {
        self.slots.push(Slot::String(value.to_string()));
    }

    fn push_light_userdata(&mut self, value: *mut c_void) {
        self.slots.push(Slot::LightUserData(value));
    }
}
