//! Presentation page endpoint.
//!
//! Renders a deck as a standalone reveal.js page. Stylesheets referenced by
//! slides are resolved on the server and inlined; `css`/`js` header assets
//! are linked through the data endpoint.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use rv_slides::ExportSettings;

use crate::error::ServerError;
use crate::handlers::FileQuery;
use crate::handlers::data::NO_CACHE;
use crate::loader::{DeckStyleLoader, is_remote};
use crate::state::AppState;

/// Handle GET /reveal/.
pub(crate) async fn get_presentation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> Result<Response, ServerError> {
    let name = state.request_name(query.filename)?;
    let settings = ExportSettings {
        cdn: state.cdn.clone(),
        overrides: state.reveal.clone(),
        asset_url,
        ..ExportSettings::default()
    };

    let storage = Arc::clone(&state.storage);
    let page = tokio::task::spawn_blocking(move || {
        let text = storage.read_to_string(&name)?;
        let loader = DeckStyleLoader::new(storage);
        Ok::<_, ServerError>(rv_slides::export(&text, &settings, &loader))
    })
    .await??;

    Ok(([(header::CACHE_CONTROL, NO_CACHE)], Html(page)).into_response())
}

/// URL under which the page loads a header asset.
fn asset_url(reference: &str) -> String {
    if is_remote(reference) {
        reference.to_owned()
    } else {
        format!(
            "/api/data?filename={}",
            utf8_percent_encode(reference, NON_ALPHANUMERIC)
        )
    }
}
