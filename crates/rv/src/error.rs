//! CLI error types.

use rv_config::ConfigError;
use rv_slides::FrontMatterError;
use rv_storage::StorageError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("Failed to write front matter: {0}")]
    FrontMatter(#[from] FrontMatterError),

    #[error("{0}")]
    Server(String),
}
