//! Harness configuration
//!
//! Every field has a default so that running the binary without arguments
//! discovers from the working directory and reports with the default
//! counter policy.

use std::path::PathBuf;

use clap::ValueEnum;

/// How modules that do not export a counter contribute to its total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CounterPolicy {
    /// A missing counter adds nothing; the number of modules that did not
    /// track it is reported next to the total.
    #[default]
    Untracked,
    /// A missing counter adds `-1` to the total.
    Propagate,
}

/// Complete harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory the tests directory search starts from
    pub root: PathBuf,

    /// Symbol listing tool
    pub nm: PathBuf,

    pub counter_policy: CounterPolicy,

    /// Run modules concurrently. Cases inside a module stay sequential.
    pub parallel: bool,

    /// Colourise outcome tags
    pub color: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            nm: PathBuf::from("nm"),
            counter_policy: CounterPolicy::default(),
            parallel: false,
            color: false,
        }
    }
}

impl HarnessConfig {
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_counter_policy(mut self, policy: CounterPolicy) -> Self {
        self.counter_policy = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
