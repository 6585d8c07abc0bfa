//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rv_storage::{StorageError, StorageErrorKind};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Request names no file and no deck is open.
    #[error("No filename given")]
    MissingFilename,

    /// Storage error while reading or writing a file.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Blocking task failed to complete.
    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::MissingFilename => (
                StatusCode::BAD_REQUEST,
                json!({"error": "No filename given"}),
            ),
            Self::Storage(e) => {
                let path = e.path.as_ref().map(|p| p.display().to_string());
                let status = match e.kind {
                    StorageErrorKind::NotFound => StatusCode::NOT_FOUND,
                    StorageErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
                    StorageErrorKind::InvalidPath => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, json!({"error": e.to_string(), "path": path}))
            }
            Self::Task(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": e.to_string()}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_codes() {
        let not_found = StorageError::io(std::io::Error::from(std::io::ErrorKind::NotFound), "a.md");
        assert_eq!(
            ServerError::from(not_found).into_response().status(),
            StatusCode::NOT_FOUND
        );

        let invalid = StorageError::new(StorageErrorKind::InvalidPath).with_path("");
        assert_eq!(
            ServerError::from(invalid).into_response().status(),
            StatusCode::BAD_REQUEST
        );

        assert_eq!(
            ServerError::MissingFilename.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
