//! Opaque host addresses passed through the interpreter

use std::ffi::c_void;
use std::ptr;

/// A raw host address travelling through the interpreter as light user data.
///
/// Non-owning on both sides of the boundary: pushing one registers no
/// finalizer, and reading one says nothing about whether the pointee is
/// still alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightUserData(pub *mut c_void);

impl LightUserData {
    /// The null handle
    pub fn null() -> Self {
        LightUserData(ptr::null_mut())
    }

    /// Wrap a typed pointer
    pub fn from_ptr<T>(p: *mut T) -> Self {
        LightUserData(p.cast())
    }

    /// Reinterpret as a typed pointer
    pub fn cast<T>(self) -> *mut T {
        self.0.cast()
    }

    /// The untyped address
    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }

    /// Check for the null handle
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl Default for LightUserData {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<*mut T> for LightUserData {
    fn from(p: *mut T) -> Self {
        LightUserData::from_ptr(p)
    }
}
