//! Native side of the harness: reading an artifact's symbol table and
//! binding its exported test entry points and counters in-process.

pub mod bindings;
pub mod dynamic_loader;
pub mod error;
pub mod symbol_table;

pub use bindings::{CounterRef, EntrySignature, HookFn, NativeFn, TestEntryFn, decode_message};
pub use dynamic_loader::DynamicLibrary;
pub use error::FfiError;
pub use symbol_table::{SymbolTableReader, parse_listing};
