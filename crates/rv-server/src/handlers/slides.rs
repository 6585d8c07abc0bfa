//! Parsed deck API endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use rv_slides::{
    Deck, DeckOptions, Grid, MemorySurface, Options, RecordingEngine, SlideParser, front_matter,
};
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::FileQuery;
use crate::state::AppState;

/// Response for GET /api/slides.
#[derive(Serialize)]
pub(crate) struct SlidesResponse {
    /// Front matter with the server's reveal options merged over it.
    headers: Options,
    theme: String,
    title: String,
    /// Slides by horizontal group, then vertical position.
    grid: Grid,
}

/// Handle GET /api/slides.
pub(crate) async fn get_slides(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> Result<Json<SlidesResponse>, ServerError> {
    let name = state.request_name(query.filename)?;

    let storage = Arc::clone(&state.storage);
    let cdn = state.cdn.clone();
    let reveal = state.reveal.clone();
    let response = tokio::task::spawn_blocking(move || {
        let text = storage.read_to_string(&name)?;
        Ok::<_, ServerError>(parse_slides(&text, &cdn, reveal))
    })
    .await??;

    Ok(Json(response))
}

fn parse_slides(text: &str, cdn: &str, reveal: Options) -> SlidesResponse {
    let mut matter = front_matter::parse_lenient(text);
    matter.data.extend(reveal);

    let mut deck = Deck::new(
        MemorySurface::new(),
        RecordingEngine::ready(),
        SlideParser::default(),
        DeckOptions::with_cdn(cdn),
    );
    deck.load(matter, None);

    SlidesResponse {
        headers: deck.front_matter(),
        theme: deck.theme(),
        title: deck.title(),
        grid: deck.grid().clone(),
    }
}
