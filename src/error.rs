use std::io;
use std::path::PathBuf;

use ctst_ffi::FfiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("could not find a 'test' or 'tests' directory from {}", root.display())]
    Discovery { root: PathBuf },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid artifact pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to write report: {0}")]
    Report(#[source] io::Error),

    #[error(transparent)]
    Ffi(#[from] FfiError),
}
