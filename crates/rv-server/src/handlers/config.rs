//! Configuration API endpoint.
//!
//! Returns client-side configuration for the editor and presentation.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use rv_slides::Options;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /api/.
#[derive(Serialize)]
pub(crate) struct ConfigResponse {
    /// Deck root directory.
    root: String,
    /// Storage name of the open deck.
    filename: Option<String>,
    /// Whether the editor is enabled.
    edit: bool,
    /// Presentation option overrides.
    reveal: Options,
}

/// Handle GET /api/.
pub(crate) async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        root: state.root.display().to_string(),
        filename: state.open_name(),
        edit: state.edit,
        reveal: state.reveal.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_response_serialization() {
        let mut reveal = Options::new();
        reveal.insert("controls".to_owned(), json!(false));
        let response = ConfigResponse {
            root: "/decks".to_owned(),
            filename: Some("talk.md".to_owned()),
            edit: true,
            reveal,
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["root"], "/decks");
        assert_eq!(json["filename"], "talk.md");
        assert_eq!(json["edit"], true);
        assert_eq!(json["reveal"]["controls"], false);
    }

    #[test]
    fn test_config_response_without_open_deck() {
        let response = ConfigResponse {
            root: ".".to_owned(),
            filename: None,
            edit: false,
            reveal: Options::new(),
        };

        let json = serde_json::to_value(&response).unwrap();

        assert!(json["filename"].is_null());
        assert_eq!(json["reveal"], json!({}));
    }
}
