//! Raw file API endpoints.
//!
//! Reads and writes decks and their assets through storage.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::ServerError;
use crate::handlers::FileQuery;
use crate::state::AppState;

/// Files are edited live; clients must never reuse a stale copy.
pub(crate) const NO_CACHE: &str = "no-store, no-cache, must-revalidate, private";

/// Request body for PUT /api/data.
#[derive(Debug, Deserialize)]
pub(crate) struct SaveRequest {
    filename: Option<String>,
    content: String,
}

/// Handle GET /api/data.
pub(crate) async fn get_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> Result<Response, ServerError> {
    let name = state.request_name(query.filename)?;
    let mime = mime_guess::from_path(&name).first_or_octet_stream();

    let storage = Arc::clone(&state.storage);
    let bytes = tokio::task::spawn_blocking(move || storage.read(&name)).await??;

    Ok((
        [
            (header::CACHE_CONTROL, NO_CACHE.to_owned()),
            (header::CONTENT_TYPE, mime.to_string()),
        ],
        bytes,
    )
        .into_response())
}

/// Handle PUT /api/data.
pub(crate) async fn put_data(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveRequest>,
) -> Result<StatusCode, ServerError> {
    let name = state.request_name(request.filename)?;

    let storage = Arc::clone(&state.storage);
    tokio::task::spawn_blocking(move || storage.write(&name, request.content.as_bytes()))
        .await??;

    Ok(StatusCode::CREATED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_request_without_filename() {
        let request: SaveRequest = serde_json::from_str(r##"{"content": "# Hi"}"##).unwrap();
        assert!(request.filename.is_none());
        assert_eq!(request.content, "# Hi");
    }
}
