//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod export;
pub(crate) mod serve;

use std::io::Write;
use std::path::Path;

pub(crate) use build::BuildArgs;
pub(crate) use export::ExportArgs;
use rv_storage::{FsStorage, Storage};
pub(crate) use serve::ServeArgs;

use crate::error::CliError;
use crate::output::Output;

/// Storage opened on `file`, so references in the deck resolve next to it.
fn deck_storage(file: &Path) -> FsStorage {
    let dir = file.parent().unwrap_or(Path::new("."));
    FsStorage::new(dir).with_filename(file)
}

/// Read a deck through its storage.
fn read_deck(storage: &FsStorage, file: &Path) -> Result<String, CliError> {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(storage.read_to_string(&name)?)
}

/// Write `text` to `out`, or to stdout when no path is given.
fn write_output(out: Option<&Path>, text: &str, output: &Output) -> Result<(), CliError> {
    match out {
        Some(path) => {
            std::fs::write(path, text)?;
            output.success(&format!("Wrote {}", path.display()));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
