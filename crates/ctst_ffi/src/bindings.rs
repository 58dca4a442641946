//! Typed handles onto an artifact's exported entry points and counters.
//!
//! Every executable symbol is bound with one fixed signature chosen by its
//! role, so nothing is ever called through a freeform lookup.

use std::ffi::{CStr, c_char, c_int};
use std::fmt;
use std::ptr::NonNull;

use tracing::trace;

use crate::dynamic_loader::DynamicLibrary;
use crate::error::FfiError;

/// A test case: no arguments, returns null on success or a borrowed,
/// NUL-terminated message describing the failure.
pub type TestEntryFn = unsafe extern "C" fn() -> *const c_char;

/// Setup and teardown hooks. Any return value is ignored.
pub type HookFn = unsafe extern "C" fn();

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::TestEntryFn {}
    impl Sealed for super::HookFn {}
}

/// Call signatures the harness knows how to bind.
pub trait EntrySignature: Copy + sealed::Sealed {
    const DESCRIPTION: &'static str;
}

impl EntrySignature for TestEntryFn {
    const DESCRIPTION: &'static str = "extern \"C\" fn() -> *const c_char";
}

impl EntrySignature for HookFn {
    const DESCRIPTION: &'static str = "extern \"C\" fn()";
}

/// A resolved native function. Holds its library so the pointer cannot
/// outlive the mapping.
#[derive(Clone)]
pub struct NativeFn<F: EntrySignature> {
    symbol: String,
    entry: F,
    _library: Option<DynamicLibrary>,
}

impl<F: EntrySignature> NativeFn<F> {
    /// Wraps a function pointer that does not come from a loaded library.
    ///
    /// # Safety
    ///
    /// `entry` must point at a function with exactly the signature `F`
    /// that stays valid for the life of the returned value.
    pub unsafe fn from_raw(symbol: impl Into<String>, entry: F) -> Self {
        Self {
            symbol: symbol.into(),
            entry,
            _library: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl<F: EntrySignature> fmt::Debug for NativeFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("symbol", &self.symbol)
            .field("signature", &F::DESCRIPTION)
            .finish()
    }
}

impl NativeFn<TestEntryFn> {
    /// Runs the test case and decodes its result message.
    pub fn call(&self) -> Result<Option<String>, FfiError> {
        trace!(symbol = %self.symbol, "calling test entry");
        // SAFETY: the pointer was resolved for this signature and the
        // library is kept alive by `self`.
        let raw = unsafe { (self.entry)() };
        // SAFETY: non-null results point at a NUL-terminated string owned
        // by the callee that stays valid at least until we copy it.
        unsafe { decode_message(raw) }
    }
}

impl NativeFn<HookFn> {
    pub fn call(&self) {
        trace!(symbol = %self.symbol, "calling hook");
        // SAFETY: see `NativeFn::<TestEntryFn>::call`.
        unsafe { (self.entry)() }
    }
}

/// Live view of one of an artifact's integer counters.
pub struct CounterRef {
    symbol: String,
    cell: NonNull<c_int>,
    _library: Option<DynamicLibrary>,
}

// SAFETY: the cell lives in the artifact's data segment for as long as
// the library handle we hold; it is only ever read, and callers serialise
// reads against native calls of the same module.
unsafe impl Send for CounterRef {}
unsafe impl Sync for CounterRef {}

impl CounterRef {
    /// Wraps an integer that does not come from a loaded library.
    ///
    /// # Safety
    ///
    /// `cell` must be valid for reads for the life of the returned value.
    pub unsafe fn from_raw(symbol: impl Into<String>, cell: *mut c_int) -> Option<Self> {
        NonNull::new(cell).map(|cell| Self {
            symbol: symbol.into(),
            cell,
            _library: None,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Reads the native counter's current value.
    pub fn read(&self) -> i32 {
        // SAFETY: `cell` is non-null and kept mapped by `_library`; native
        // code may have written it since the last read, hence volatile.
        unsafe { self.cell.as_ptr().read_volatile() }
    }
}

impl fmt::Debug for CounterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CounterRef")
            .field("symbol", &self.symbol)
            .field("value", &self.read())
            .finish()
    }
}

impl DynamicLibrary {
    /// Resolves `symbol` as a function with signature `F`.
    pub fn bind_fn<F: EntrySignature>(&self, symbol: &str) -> Result<NativeFn<F>, FfiError> {
        // SAFETY: `F` is one of the sealed zero-argument C signatures that
        // the naming convention promises for this symbol.
        let resolved = unsafe { self.get::<F>(symbol.as_bytes()) };
        let entry = *resolved.map_err(|source| FfiError::Unresolved {
            symbol: symbol.to_string(),
            source,
        })?;

        Ok(NativeFn {
            symbol: symbol.to_string(),
            entry,
            _library: Some(self.clone()),
        })
    }

    /// Resolves `symbol` as the address of a native `int`.
    pub fn bind_counter(&self, symbol: &str) -> Result<CounterRef, FfiError> {
        // SAFETY: only the address is taken here; it is not dereferenced.
        let resolved = unsafe { self.get::<*mut c_int>(symbol.as_bytes()) };
        let address = *resolved.map_err(|source| FfiError::Unresolved {
            symbol: symbol.to_string(),
            source,
        })?;
        let cell = NonNull::new(address).ok_or_else(|| FfiError::NullSymbol {
            symbol: symbol.to_string(),
        })?;

        Ok(CounterRef {
            symbol: symbol.to_string(),
            cell,
            _library: Some(self.clone()),
        })
    }
}

/// Copies a test's result message out of native memory. Null means the
/// test passed; the buffer itself stays owned by the callee.
///
/// # Safety
///
/// `raw` must be null or point at a NUL-terminated string that remains
/// valid for the duration of this call.
pub unsafe fn decode_message(raw: *const c_char) -> Result<Option<String>, FfiError> {
    if raw.is_null() {
        return Ok(None);
    }

    let message = unsafe { CStr::from_ptr(raw) };
    match message.to_str() {
        Ok(text) => Ok(Some(text.to_owned())),
        Err(source) => Err(FfiError::Decode {
            lossy: message.to_string_lossy().into_owned(),
            source,
        }),
    }
}
