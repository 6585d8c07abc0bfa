//! Storage error types.

use std::path::PathBuf;

/// What went wrong, independent of the underlying I/O error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    NotFound,
    PermissionDenied,
    /// Name cannot be resolved to a path.
    InvalidPath,
    Other,
}

#[derive(Debug)]
pub struct StorageError {
    pub kind: StorageErrorKind,
    /// Resolved path, or the raw name when resolution failed.
    pub path: Option<PathBuf>,
    source: Option<std::io::Error>,
}

impl StorageError {
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Classify an I/O error raised for `path`.
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        use std::io::ErrorKind;

        let kind = match err.kind() {
            ErrorKind::NotFound => StorageErrorKind::NotFound,
            ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            ErrorKind::InvalidFilename => StorageErrorKind::InvalidPath,
            _ => StorageErrorKind::Other,
        };
        Self {
            kind,
            path: Some(path.into()),
            source: Some(err),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // "<kind>[: <io error>][ (path: <path>)]"
        f.write_str(match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::Other => "Error",
        })?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        match &self.path {
            Some(path) => write!(f, " (path: {})", path.display()),
            None => Ok(()),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}
