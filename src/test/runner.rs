use std::io::Write;
use std::time::Duration;

use ctst_ffi::FfiError;
use ctst_symbol::{CounterKind, Expectation};
use ctst_utils::Stopwatch;
use rayon::prelude::*;
use tracing::{debug, trace};

use super::discovery::{ArtifactError, TestDiscovery};
use super::module::{TestFunction, TestModule};
use super::reporter::{OutcomeTally, TestReporter, Totals};
use crate::config::HarnessConfig;
use crate::error::HarnessError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Skip,
    Fail(String),
}

/// Decides a case's outcome from its expectation and decoded result.
/// Skip-named cases are skipped whatever they return; a message that is
/// not valid UTF-8 still counts as a failure.
pub fn classify_outcome(
    expectation: Expectation,
    result: Result<Option<String>, FfiError>,
) -> Outcome {
    match (expectation, result) {
        (Expectation::Skip, _) => Outcome::Skip,
        (Expectation::Pass, Ok(None)) => Outcome::Ok,
        (Expectation::Pass, Ok(Some(reason))) => Outcome::Fail(reason),
        (Expectation::Pass, Err(err)) => Outcome::Fail(err.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct TestResult {
    /// `<artifact>::<test-name>`
    pub id: String,
    pub outcome: Outcome,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Discovering,
    Running { module: usize, test: usize },
    Summarizing,
    Done,
}

#[derive(Debug)]
pub struct RunSummary {
    pub results: Vec<TestResult>,
    pub totals: Totals,
    pub tally: OutcomeTally,
    pub errors: Vec<ArtifactError>,
    pub elapsed: Duration,
}

impl RunSummary {
    /// A run passes when the artifacts report no failures, the harness saw
    /// no failing case, and every artifact could be bound.
    pub fn is_success(&self) -> bool {
        self.totals.value(CounterKind::Failed) <= 0
            && self.tally.failed == 0
            && self.errors.is_empty()
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }
}

pub struct TestRunner {
    config: HarnessConfig,
    state: RunState,
    history: Vec<RunState>,
}

impl TestRunner {
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            state: RunState::Idle,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Every state entered since `Idle`, in order.
    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    /// Discovers and runs every module, writing the report to `out`.
    /// Discovery failures return before anything is written.
    pub fn run<W: Write>(&mut self, out: W) -> Result<RunSummary, HarnessError> {
        let stopwatch = Stopwatch::start_new();

        self.transition(RunState::Discovering);
        let discovery = TestDiscovery::new(&self.config).discover(&self.config.root)?;

        let mut reporter = TestReporter::new(out, self.config.color);
        let mut totals = Totals::new(self.config.counter_policy);
        let mut tally = OutcomeTally::default();
        let mut results = Vec::new();

        if self.config.parallel {
            let reports: Vec<Vec<TestResult>> = discovery
                .modules
                .par_iter()
                .map(|module| {
                    module
                        .tests()
                        .iter()
                        .map(|test| execute(module, test))
                        .collect::<Vec<_>>()
                })
                .collect();

            // cases have already run; replay their states in report order
            for (module_index, (module, module_results)) in
                discovery.modules.iter().zip(reports).enumerate()
            {
                reporter.module_header(module.path()).map_err(HarnessError::Report)?;
                for (test_index, result) in module_results.into_iter().enumerate() {
                    self.transition(RunState::Running {
                        module: module_index,
                        test: test_index,
                    });
                    reporter.record(&result).map_err(HarnessError::Report)?;
                    tally.add(&result.outcome);
                    results.push(result);
                }
                totals.merge(module.counters());
            }
        } else {
            for (module_index, module) in discovery.modules.iter().enumerate() {
                reporter.module_header(module.path()).map_err(HarnessError::Report)?;
                for (test_index, test) in module.tests().iter().enumerate() {
                    self.transition(RunState::Running {
                        module: module_index,
                        test: test_index,
                    });
                    let result = execute(module, test);
                    reporter.record(&result).map_err(HarnessError::Report)?;
                    tally.add(&result.outcome);
                    results.push(result);
                }
                totals.merge(module.counters());
            }
        }

        self.transition(RunState::Summarizing);
        let elapsed = stopwatch.elapsed();
        reporter
            .finish(&totals, &tally, &discovery.errors, elapsed)
            .map_err(HarnessError::Report)?;
        self.transition(RunState::Done);

        Ok(RunSummary {
            results,
            totals,
            tally,
            errors: discovery.errors,
            elapsed,
        })
    }

    fn transition(&mut self, next: RunState) {
        trace!(from = ?self.state, to = ?next, "harness state");
        self.state = next;
        self.history.push(next);
    }
}

fn execute(module: &TestModule, test: &TestFunction) -> TestResult {
    let (result, duration) = Stopwatch::time(|| module.run(test));
    let outcome = classify_outcome(test.expectation(), result);
    debug!(test = %test, ?outcome, ?duration, "test finished");

    TestResult {
        id: test.to_string(),
        outcome,
        duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CounterPolicy;
    use crate::test::module::CounterSnapshot;

    fn decode_error() -> FfiError {
        let bytes = vec![b'f', u8::MAX];
        let source = std::str::from_utf8(&bytes).unwrap_err();
        FfiError::Decode {
            lossy: String::from_utf8_lossy(&bytes).into_owned(),
            source,
        }
    }

    #[test]
    fn test_pass_outcomes() {
        assert_eq!(classify_outcome(Expectation::Pass, Ok(None)), Outcome::Ok);
        assert_eq!(
            classify_outcome(Expectation::Pass, Ok(Some("reason".into()))),
            Outcome::Fail("reason".into())
        );
    }

    #[test]
    fn test_skip_ignores_result() {
        assert_eq!(classify_outcome(Expectation::Skip, Ok(None)), Outcome::Skip);
        assert_eq!(
            classify_outcome(Expectation::Skip, Ok(Some("not ready".into()))),
            Outcome::Skip
        );
        assert_eq!(classify_outcome(Expectation::Skip, Err(decode_error())), Outcome::Skip);
    }

    #[test]
    fn test_decode_error_is_failure() {
        match classify_outcome(Expectation::Pass, Err(decode_error())) {
            Outcome::Fail(reason) => assert!(reason.contains("not valid UTF-8")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    fn summary(snapshot: CounterSnapshot, tally: OutcomeTally) -> RunSummary {
        let mut totals = Totals::new(CounterPolicy::Untracked);
        totals.merge(snapshot);
        RunSummary {
            results: Vec::new(),
            totals,
            tally,
            errors: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_exit_code() {
        let clean = summary(
            CounterSnapshot {
                failed: Some(0),
                succeeded: Some(3),
                skipped: Some(0),
            },
            OutcomeTally {
                ok: 3,
                failed: 0,
                skipped: 0,
            },
        );
        assert_eq!(clean.exit_code(), 0);

        let counted = summary(
            CounterSnapshot {
                failed: Some(2),
                ..CounterSnapshot::default()
            },
            OutcomeTally::default(),
        );
        assert_eq!(counted.exit_code(), 1);

        // untracked counters, but the harness saw a failing case
        let observed = summary(
            CounterSnapshot::default(),
            OutcomeTally {
                ok: 0,
                failed: 1,
                skipped: 0,
            },
        );
        assert_eq!(observed.exit_code(), 1);

        let untracked = summary(
            CounterSnapshot::default(),
            OutcomeTally {
                ok: 0,
                failed: 0,
                skipped: 1,
            },
        );
        assert_eq!(untracked.exit_code(), 0);
    }

    #[test]
    fn test_discovery_failure_leaves_output_empty() {
        let config = HarnessConfig::default().with_root("/nonexistent/ctst/project");
        let mut runner = TestRunner::new(config);
        let mut out = Vec::new();
        assert!(runner.run(&mut out).is_err());
        assert!(out.is_empty());
        assert_eq!(runner.state(), RunState::Discovering);
        assert_eq!(runner.history(), [RunState::Discovering]);
    }

    #[test]
    fn test_empty_run_history() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("tests")).unwrap();

        let mut runner = TestRunner::new(HarnessConfig::default().with_root(tmp.path()));
        assert_eq!(runner.state(), RunState::Idle);
        let summary = runner.run(Vec::<u8>::new()).unwrap();

        assert_eq!(
            runner.history(),
            [RunState::Discovering, RunState::Summarizing, RunState::Done]
        );
        assert_eq!(summary.exit_code(), 0);
    }
}
