//! File collaborator for RV.
//!
//! Decks and the assets they reference are addressed by name. A name is
//! resolved against the configured root, or against the directory of the
//! currently open deck (see [`FsStorage`]).
//!
//! # Example
//!
//! ```ignore
//! use rv_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new("decks").with_filename("decks/talk/deck.md");
//! let css = storage.read_to_string("theme.css")?; // decks/talk/theme.css
//! ```

mod error;
mod fs;

pub use error::{StorageError, StorageErrorKind};
pub use fs::{FsStorage, Storage};
