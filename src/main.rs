use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use ctst::{CounterPolicy, HarnessConfig, TestRunner};
use ctst_utils::init_logging;

/// Run the test cases exported by compiled `test_*` shared libraries.
#[derive(Debug, Parser)]
#[command(name = "ctst", version, about)]
struct Cli {
    /// Directory to start looking for the tests directory from
    #[arg(long)]
    root: Option<PathBuf>,

    /// Symbol listing tool
    #[arg(long, default_value = "nm")]
    nm: PathBuf,

    /// How modules without result counters contribute to the totals
    #[arg(long, value_enum, default_value_t = CounterPolicy::Untracked)]
    counter_policy: CounterPolicy,

    /// Run modules concurrently
    #[arg(long)]
    parallel: bool,

    /// Never colourise outcome tags
    #[arg(long)]
    no_color: bool,

    /// More diagnostics on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> HarnessConfig {
        let defaults = HarnessConfig::default();
        HarnessConfig {
            root: self.root.unwrap_or(defaults.root),
            nm: self.nm,
            counter_policy: self.counter_policy,
            parallel: self.parallel,
            color: !self.no_color && io::stdout().is_terminal(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.into_config();
    let mut runner = TestRunner::new(config);
    let summary = runner
        .run(io::stdout().lock())
        .context("test run aborted")?;
    Ok(ExitCode::from(summary.exit_code()))
}
