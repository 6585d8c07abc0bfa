//! `rv export` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use rv_config::Config;
use rv_server::{DeckStyleLoader, server_config_from_rv_config};
use rv_slides::ExportSettings;

use crate::commands::{deck_storage, read_deck, write_output};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the export command.
#[derive(Args)]
pub(crate) struct ExportArgs {
    /// Deck to export.
    file: PathBuf,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover rv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ExportArgs {
    /// Execute the export command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let server = server_config_from_rv_config(&config);
        let settings = ExportSettings {
            cdn: server.cdn,
            overrides: server.reveal,
            ..ExportSettings::default()
        };

        let storage = Arc::new(deck_storage(&self.file));
        let text = read_deck(&storage, &self.file)?;
        let loader = DeckStyleLoader::new(storage);

        let page = rv_slides::export(&text, &settings, &loader);
        write_output(self.output.as_deref(), &page, output)
    }
}
