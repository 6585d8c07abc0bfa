//! Stylesheet loading for server-side rendering.

use std::sync::Arc;
use std::time::Duration;

use rv_slides::{StyleLoadError, StyleLoader};
use rv_storage::Storage;
use ureq::Agent;

/// Timeout for remote stylesheet requests, in seconds.
const FETCH_TIMEOUT: u64 = 10;

/// Loads stylesheets from storage, or over HTTP for absolute URLs.
pub struct DeckStyleLoader {
    storage: Arc<dyn Storage>,
    agent: Agent,
}

impl DeckStyleLoader {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(FETCH_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();
        Self { storage, agent }
    }

    fn fetch(&self, url: &str) -> Result<String, StyleLoadError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| StyleLoadError::new(url, e.to_string()))?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(StyleLoadError::new(url, format!("HTTP {status}")));
        }
        response
            .into_body()
            .read_to_string()
            .map_err(|e| StyleLoadError::new(url, e.to_string()))
    }
}

impl StyleLoader for DeckStyleLoader {
    fn load(&self, reference: &str) -> Result<String, StyleLoadError> {
        if is_remote(reference) {
            tracing::debug!(url = reference, "Fetching remote stylesheet");
            return self.fetch(reference);
        }
        self.storage
            .read_to_string(reference)
            .map_err(|e| StyleLoadError::new(reference, e.to_string()))
    }
}

/// Whether `reference` is an absolute URL rather than a storage name.
pub(crate) fn is_remote(reference: &str) -> bool {
    reference.contains("://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rv_storage::FsStorage;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://cdn.example/theme.css"));
        assert!(!is_remote("theme.css"));
        assert!(!is_remote("~/shared/theme.css"));
    }

    #[test]
    fn test_load_from_storage() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("extra.css"), "h1 { color: red; }").unwrap();

        let loader = DeckStyleLoader::new(Arc::new(FsStorage::new(dir.path())));
        assert_eq!(loader.load("extra.css").unwrap(), "h1 { color: red; }");
    }

    #[test]
    fn test_load_missing_reports_reference() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DeckStyleLoader::new(Arc::new(FsStorage::new(dir.path())));

        let err = loader.load("missing.css").unwrap_err();
        assert_eq!(err.reference, "missing.css");
        assert!(err.message.contains("Not found"));
    }
}
