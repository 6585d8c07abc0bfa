//! Filesystem storage.

use std::path::{Path, PathBuf};

use crate::error::{StorageError, StorageErrorKind};

/// Prefix forcing resolution against the root.
const ROOT_PREFIX: &str = "~/";

/// Read/write access to files named relative to a root or an open file.
pub trait Storage: Send + Sync {
    /// Read the full content of `name`.
    fn read(&self, name: &str) -> Result<Vec<u8>, StorageError>;

    /// Overwrite `name` with `content`.
    fn write(&self, name: &str, content: &[u8]) -> Result<(), StorageError>;

    /// Read `name` as UTF-8 text.
    fn read_to_string(&self, name: &str) -> Result<String, StorageError> {
        let bytes = self.read(name)?;
        String::from_utf8(bytes).map_err(|_| {
            StorageError::new(StorageErrorKind::Other).with_path(name)
        })
    }
}

/// Storage backed by the local filesystem.
///
/// Names starting with `~/`, and every name when no file is open, resolve
/// against the root. Other names resolve against the directory of the open
/// file, so a deck can reference assets next to it.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
    filename: Option<PathBuf>,
}

impl FsStorage {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            filename: None,
        }
    }

    /// Set the currently open file.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Resolve `name` to a filesystem path.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        if name.is_empty() || name.contains('\0') {
            return Err(StorageError::new(StorageErrorKind::InvalidPath).with_path(name));
        }

        let path = match (name.strip_prefix(ROOT_PREFIX), &self.filename) {
            (Some(rest), _) => self.root.join(rest),
            (None, None) => self.root.join(name),
            (None, Some(open)) => open
                .parent()
                .unwrap_or(&self.root)
                .join(name),
        };
        Ok(path)
    }
}

impl Storage for FsStorage {
    fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(name)?;
        tracing::debug!(path = %path.display(), "Reading file");
        std::fs::read(&path).map_err(|e| StorageError::io(e, path))
    }

    fn write(&self, name: &str, content: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(name)?;
        tracing::info!(path = %path.display(), bytes = content.len(), "Writing file");
        std::fs::write(&path, content).map_err(|e| StorageError::io(e, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_fs_storage_is_send_sync() {
        assert_send_sync::<FsStorage>();
    }

    #[test]
    fn test_resolve_without_open_file() {
        let storage = FsStorage::new("/decks");
        assert_eq!(storage.resolve("a.md").unwrap(), PathBuf::from("/decks/a.md"));
        assert_eq!(storage.resolve("~/a.md").unwrap(), PathBuf::from("/decks/a.md"));
    }

    #[test]
    fn test_resolve_relative_to_open_file() {
        let storage = FsStorage::new("/decks").with_filename("/talks/2024/deck.md");
        assert_eq!(
            storage.resolve("style.css").unwrap(),
            PathBuf::from("/talks/2024/style.css")
        );
        assert_eq!(
            storage.resolve("~/shared/theme.css").unwrap(),
            PathBuf::from("/decks/shared/theme.css")
        );
    }

    #[test]
    fn test_resolve_rejects_empty() {
        let err = FsStorage::new("/decks").resolve("").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_read_write() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());

        storage.write("deck.md", b"# Hello").unwrap();
        assert_eq!(storage.read("deck.md").unwrap(), b"# Hello");
        assert_eq!(storage.read_to_string("~/deck.md").unwrap(), "# Hello");

        storage.write("deck.md", b"x").unwrap();
        assert_eq!(storage.read_to_string("deck.md").unwrap(), "x");
    }

    #[test]
    fn test_read_next_to_open_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("talk")).unwrap();
        std::fs::write(dir.path().join("talk/deck.md"), "x").unwrap();
        std::fs::write(dir.path().join("talk/extra.css"), "p{}").unwrap();

        let storage = FsStorage::new(dir.path()).with_filename(dir.path().join("talk/deck.md"));
        assert_eq!(storage.read_to_string("extra.css").unwrap(), "p{}");
        assert!(storage.read("~/extra.css").unwrap_err().is_not_found());
    }

    #[test]
    fn test_read_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsStorage::new(dir.path()).read("nope.md").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.path, Some(dir.path().join("nope.md")));
    }

    #[test]
    fn test_read_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bin"), [0xff, 0xfe]).unwrap();
        let err = FsStorage::new(dir.path()).read_to_string("bin").unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::Other);
    }
}
