//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use axum::response::Redirect;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/", get(handlers::config::get_config))
        .route(
            "/api/data",
            get(handlers::data::get_data).put(handlers::data::put_data),
        )
        .route("/api/slides", get(handlers::slides::get_slides));

    Router::new()
        .merge(api_routes)
        .route("/", get(|| async { Redirect::temporary("/reveal/") }))
        .route("/reveal/", get(handlers::presentation::get_presentation))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                )),
        )
        .with_state(state)
}
