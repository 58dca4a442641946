pub mod runner;

pub use discovery::{ArtifactError, Discovery, TestDiscovery, find_artifacts, find_tests_dir};
pub use module::{CounterSlot, CounterSnapshot, Counters, TestFunction, TestModule};
pub use reporter::{CounterTotal, OutcomeTally, TestReporter, Totals};
pub use runner::{Outcome, RunState, RunSummary, TestResult, TestRunner, classify_outcome};
