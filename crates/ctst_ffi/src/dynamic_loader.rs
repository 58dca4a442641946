use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use libloading::Library;
use tracing::debug;

use crate::error::FfiError;

/// Thin wrapper around a `libloading::Library` with reference counting so
/// every binding resolved from it keeps the mapping alive.
#[derive(Clone)]
pub struct DynamicLibrary {
    inner: Arc<Library>,
}

impl DynamicLibrary {
    /// Maps the artifact at `path` into the process.
    pub fn open(path: &Path) -> Result<Self, FfiError> {
        // Loading runs the artifact's initialisers; test libraries are
        // trusted code the user asked us to run.
        let library = unsafe { Library::new(path) }.map_err(|source| FfiError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded test library");

        Ok(Self {
            inner: Arc::new(library),
        })
    }
}

impl Deref for DynamicLibrary {
    type Target = Library;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_library_is_load_error() {
        let err = DynamicLibrary::open(Path::new("/nonexistent/dir/test_missing.so")).err();
        assert!(matches!(err, Some(FfiError::Load { .. })));
    }

    #[test]
    fn test_non_library_is_load_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("test_garbage.so");
        std::fs::write(&path, b"not a shared object").unwrap();

        match DynamicLibrary::open(&path) {
            Err(FfiError::Load { path: reported, .. }) => assert_eq!(reported, path),
            Err(other) => panic!("expected load error, got {other}"),
            Ok(_) => panic!("garbage loaded as a library"),
        }
    }
}
