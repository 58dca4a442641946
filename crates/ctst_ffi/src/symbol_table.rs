use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use ctst_symbol::{SymbolClass, SymbolRecord};
use tracing::debug;

use crate::error::FfiError;

#[cfg(target_os = "macos")]
const LIST_ARGS: &[&str] = &["-gU"];
#[cfg(not(target_os = "macos"))]
const LIST_ARGS: &[&str] = &["--extern-only", "--defined-only"];

/// Lists an artifact's defined, exported symbols with an external `nm`.
#[derive(Debug, Clone)]
pub struct SymbolTableReader {
    tool: PathBuf,
}

impl Default for SymbolTableReader {
    fn default() -> Self {
        Self::new("nm")
    }
}

impl SymbolTableReader {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    pub fn read(&self, artifact: &Path) -> Result<Vec<SymbolRecord>, FfiError> {
        let mut args: Vec<&OsStr> = LIST_ARGS.iter().map(OsStr::new).collect();
        args.push(artifact.as_os_str());

        let output = duct::cmd(self.tool.as_os_str(), args)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .map_err(|source| FfiError::ToolSpawn {
                tool: self.tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(FfiError::SymbolExtraction {
                path: artifact.to_path_buf(),
                diagnostics: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let records = parse_listing(&String::from_utf8_lossy(&output.stdout));
        debug!(
            path = %artifact.display(),
            symbols = records.len(),
            "read symbol table"
        );
        Ok(records)
    }
}

/// Parses `nm` output of the form `<address> <type> <name>`. Lines without
/// an address, and types the harness has no use for, are dropped.
pub fn parse_listing(listing: &str) -> Vec<SymbolRecord> {
    listing.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<SymbolRecord> {
    let mut parts = line.split_whitespace();
    let (_address, letter, name) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let mut letters = letter.chars();
    let class = SymbolClass::from_nm_letter(letters.next()?)?;
    if letters.next().is_some() {
        return None;
    }

    Some(SymbolRecord::new(platform_name(name), class))
}

/// Mach-O prefixes C symbols with an underscore that `dlsym` does not expect.
#[cfg(target_os = "macos")]
fn platform_name(name: &str) -> &str {
    name.strip_prefix('_').unwrap_or(name)
}

#[cfg(not(target_os = "macos"))]
fn platform_name(name: &str) -> &str {
    name
}
