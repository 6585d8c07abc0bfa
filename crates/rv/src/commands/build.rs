//! `rv build` command implementation.

use std::path::PathBuf;

use clap::Args;
use rv_slides::{Deck, DeckOptions, MemorySurface, RecordingEngine, SlideParser};

use crate::commands::{deck_storage, read_deck, write_output};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Deck to normalize.
    file: PathBuf,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl BuildArgs {
    /// Execute the build command.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let storage = deck_storage(&self.file);
        let text = read_deck(&storage, &self.file)?;
        let built = normalize(&text)?;
        write_output(self.output.as_deref(), &built, output)
    }
}

/// Parse `text` and serialize it back.
fn normalize(text: &str) -> Result<String, CliError> {
    let mut deck = Deck::new(
        MemorySurface::new(),
        RecordingEngine::ready(),
        SlideParser::default(),
        DeckOptions::default(),
    );
    deck.update(text);
    tracing::info!(sections = deck.grid().len(), "Parsed deck");
    Ok(deck.build()?)
}
