//! Naming convention shared between compiled test code and the harness.
//!
//! Executable symbols prefixed `test_` or `skip_` are test cases,
//! `__ctst_setup` / `__ctst_teardown` bracket every case, and the three
//! `__ctst_*` data symbols are the artifact's own result counters.

use core::fmt;

use crate::symbol::{SymbolKind, SymbolRecord};

pub const TEST_PREFIX: &str = "test_";
pub const SKIP_PREFIX: &str = "skip_";
pub const SETUP_SYMBOL: &str = "__ctst_setup";
pub const TEARDOWN_SYMBOL: &str = "__ctst_teardown";

/// What a test case is expected to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expectation {
    Pass,
    /// Always reported as skipped, whatever the function returns.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    Failed,
    Succeeded,
    Skipped,
}

impl CounterKind {
    pub const ALL: [Self; 3] = [Self::Failed, Self::Succeeded, Self::Skipped];

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Failed => "__ctst_failed",
            Self::Succeeded => "__ctst_succeeded",
            Self::Skipped => "__ctst_skipped",
        }
    }

    pub fn from_symbol(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.symbol() == name)
    }
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed => write!(f, "failed"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    TestCase(Expectation),
    Setup,
    Teardown,
    Counter(CounterKind),
    Ignored,
}

/// Maps a symbol onto its role. Total: every record gets exactly one.
pub fn classify(record: &SymbolRecord) -> Role {
    let name = record.name.as_str();
    match record.class.kind {
        SymbolKind::Code => match name {
            SETUP_SYMBOL => Role::Setup,
            TEARDOWN_SYMBOL => Role::Teardown,
            _ if name.starts_with(TEST_PREFIX) => Role::TestCase(Expectation::Pass),
            _ if name.starts_with(SKIP_PREFIX) => Role::TestCase(Expectation::Skip),
            _ => Role::Ignored,
        },
        SymbolKind::Data => CounterKind::from_symbol(name).map_or(Role::Ignored, Role::Counter),
    }
}
