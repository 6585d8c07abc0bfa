//! HTTP request handlers.

use serde::Deserialize;

pub(crate) mod config;
pub(crate) mod data;
pub(crate) mod presentation;
pub(crate) mod slides;

/// Query naming a deck or asset; absent means the open deck.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FileQuery {
    pub(crate) filename: Option<String>,
}
