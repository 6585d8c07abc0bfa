//! HTTP server for RV slide decks.
//!
//! Serves the open deck and its assets to the editor and presentation:
//!
//! - `GET /api/`: client configuration
//! - `GET /api/data?filename=`: raw file content, never cached
//! - `PUT /api/data`: save `{filename, content}`
//! - `GET /api/slides?filename=`: parsed slide grid and headers
//! - `GET /reveal/?filename=`: standalone presentation page
//!
//! Requests without a `filename` use the deck opened at startup. The root
//! path is the editor entry point; the editor client itself is served
//! separately, so `/` redirects to the presentation.
//!
//! # Quick Start
//!
//! ```ignore
//! use rv_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         root: "talks".into(),
//!         filename: Some("talks/intro.md".into()),
//!         ..ServerConfig::default()
//!     };
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod loader;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use rv_slides::{DEFAULT_CDN, Options};
use rv_storage::FsStorage;
use serde_json::Value;
use state::AppState;

pub use loader::DeckStyleLoader;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Deck root directory.
    pub root: PathBuf,
    /// Deck opened at startup.
    pub filename: Option<PathBuf>,
    /// Open the editor instead of the presentation.
    pub edit: bool,
    /// Open a browser once listening.
    pub open: bool,
    /// Presentation options applied over every deck's front matter.
    pub reveal: Options,
    /// Base URL of the presentation engine's assets.
    pub cdn: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            root: PathBuf::from("."),
            filename: None,
            edit: false,
            open: false,
            reveal: Options::new(),
            cdn: DEFAULT_CDN.to_owned(),
        }
    }
}

impl ServerConfig {
    /// Address the browser is pointed at.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Page to open: the editor root, or the presentation of the open deck.
    #[must_use]
    pub fn start_url(&self) -> String {
        let name = self
            .filename
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy());
        match name {
            Some(name) if !self.edit => format!(
                "{}/reveal/?filename={}",
                self.base_url(),
                utf8_percent_encode(&name, NON_ALPHANUMERIC)
            ),
            _ => format!("{}/", self.base_url()),
        }
    }
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut storage = FsStorage::new(config.root.clone());
    if let Some(filename) = &config.filename {
        storage = storage.with_filename(filename);
    }

    let state = Arc::new(AppState {
        storage: Arc::new(storage),
        root: config.root.clone(),
        filename: config.filename.clone(),
        edit: config.edit,
        reveal: config.reveal.clone(),
        cdn: config.cdn.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    if config.open {
        let url = config.start_url();
        if let Err(e) = webbrowser::open(&url) {
            tracing::warn!(error = %e, url = %url, "Failed to open browser");
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from RV config.
#[must_use]
pub fn server_config_from_rv_config(config: &rv_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        root: config.deck_resolved.root.clone(),
        filename: config.deck_resolved.filename.clone(),
        edit: config.deck_resolved.edit,
        open: config.deck_resolved.open,
        reveal: reveal_options(&config.reveal),
        cdn: config
            .assets
            .cdn
            .clone()
            .unwrap_or_else(|| DEFAULT_CDN.to_owned()),
    }
}

/// Convert the `[reveal]` table to engine options.
fn reveal_options(table: &toml::Table) -> Options {
    match serde_json::to_value(table) {
        Ok(Value::Object(options)) => options,
        Ok(_) => Options::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring [reveal] options");
            Options::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_start_url() {
        let mut config = ServerConfig::default();
        assert_eq!(config.start_url(), "http://127.0.0.1:7979/");

        config.filename = Some(PathBuf::from("/talks/my talk.md"));
        assert_eq!(
            config.start_url(),
            "http://127.0.0.1:7979/reveal/?filename=my%20talk%2Emd"
        );

        config.edit = true;
        assert_eq!(config.start_url(), "http://127.0.0.1:7979/");
    }

    #[test]
    fn test_reveal_options_from_toml() {
        let table: toml::Table = toml::from_str("controls = false\ntransition = \"fade\"").unwrap();
        let options = reveal_options(&table);
        assert_eq!(options["controls"], json!(false));
        assert_eq!(options["transition"], json!("fade"));
    }

    #[test]
    fn test_server_config_from_rv_config() {
        let mut config = rv_config::Config::default();
        config.server.port = 9000;
        config.assets.cdn = Some("https://cdn.example/reveal/".to_owned());

        let server = server_config_from_rv_config(&config);
        assert_eq!(server.port, 9000);
        assert_eq!(server.cdn, "https://cdn.example/reveal/");
        assert!(server.reveal.is_empty());
    }
}
