use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FfiError {
    #[error("failed to run symbol tool `{}`: {source}", tool.display())]
    ToolSpawn {
        tool: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read symbols from {}: {diagnostics}", path.display())]
    SymbolExtraction { path: PathBuf, diagnostics: String },

    #[error("failed to load test library {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("symbol `{symbol}` is not resolvable: {source}")]
    Unresolved {
        symbol: String,
        #[source]
        source: libloading::Error,
    },

    #[error("symbol `{symbol}` resolved to a null address")]
    NullSymbol { symbol: String },

    #[error("result message is not valid UTF-8 ({lossy:?})")]
    Decode {
        lossy: String,
        #[source]
        source: Utf8Error,
    },
}
