//! Application state.
//!
//! Shared state for all request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use rv_slides::Options;
use rv_storage::Storage;

use crate::error::ServerError;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Storage backend for reading and writing files.
    pub(crate) storage: Arc<dyn Storage>,
    /// Deck root directory.
    pub(crate) root: PathBuf,
    /// Currently open deck.
    pub(crate) filename: Option<PathBuf>,
    /// Whether the editor is enabled.
    pub(crate) edit: bool,
    /// Presentation options applied over every deck's front matter.
    pub(crate) reveal: Options,
    /// Base URL of the presentation engine's assets.
    pub(crate) cdn: String,
}

impl AppState {
    /// Storage name of the open deck, resolved against its own directory.
    pub(crate) fn open_name(&self) -> Option<String> {
        self.filename
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }

    /// Name from a request, falling back to the open deck.
    pub(crate) fn request_name(&self, filename: Option<String>) -> Result<String, ServerError> {
        filename
            .filter(|name| !name.is_empty())
            .or_else(|| self.open_name())
            .ok_or(ServerError::MissingFilename)
    }
}
