//! Test harness for compiled C test libraries.
//!
//! Artifacts named `test_*` are located under the project's tests
//! directory, their symbol tables are read to find test cases, hooks and
//! counters, and every case is called in-process.

pub mod config;
pub mod error;
pub mod test;

pub use config::{CounterPolicy, HarnessConfig};
pub use error::HarnessError;
pub use test::{RunState, RunSummary, TestDiscovery, TestModule, TestRunner};
