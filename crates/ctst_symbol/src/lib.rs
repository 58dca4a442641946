//! Symbol records read from compiled test artifacts and the naming
//! convention that maps them onto test entities.

pub mod role;
pub mod symbol;

pub use role::{CounterKind, Expectation, Role, classify};
pub use symbol::{Linkage, SymbolClass, SymbolKind, SymbolRecord};
