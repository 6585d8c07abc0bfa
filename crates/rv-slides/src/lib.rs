//! Slide document model for markdown decks.
//!
//! A deck is a markdown document split into horizontal groups by `===` lines
//! and vertical slides by `--` lines. Each slide may carry `// key=value`
//! directives. This crate parses decks into a dense grid of slides, keeps a
//! presentation [`Surface`] in sync with minimal mutations as the text
//! changes, and serializes the grid back to text.
//!
//! # Example
//!
//! ```
//! use rv_slides::{Deck, DeckOptions, MemorySurface, RecordingEngine, SlideParser};
//!
//! let mut deck = Deck::new(
//!     MemorySurface::new(),
//!     RecordingEngine::ready(),
//!     SlideParser::default(),
//!     DeckOptions::default(),
//! );
//! deck.update("# Intro\n--\nDetails\n===\n# Next");
//!
//! assert_eq!(deck.grid().len(), 2);
//! assert_eq!(deck.grid()[0].len(), 2);
//! ```

mod build;
mod convert;
mod deck;
mod directive;
mod engine;
mod export;
pub mod front_matter;
mod grid;
mod hash;
mod headers;
mod memory;
mod reconcile;
mod scope;
mod slide;
mod styles;
mod surface;
mod template;

pub use build::{build_body, build_document};
pub use convert::{
    CmarkConverter, FilterFn, JinjaConverter, MarkdownConverter, TemplateConverter, TemplateError,
    TemplateFilters,
};
pub use deck::{DEFAULT_CDN, Deck, DeckOptions};
pub use directive::{Directives, parse_directives};
pub use engine::{
    Dependency, EngineCall, EngineDriver, EngineState, Location, Options, RecordingEngine,
    RenderingEngine,
};
pub use export::{ExportSettings, StaticDeck, export, load_static, render_page};
pub use front_matter::{FrontMatterError, Matter};
pub use grid::{Grid, GridBuild, HORIZONTAL_DELIMITER, Slot, VERTICAL_DELIMITER, build_grid, split_document};
pub use hash::hash;
pub use headers::{DEFAULT_THEME, HeaderReducer, HeaderUpdate, default_options, theme_href};
pub use memory::{MemorySurface, SurfaceOp};
pub use reconcile::{ReconcileStats, container_html, reconcile};
pub use scope::scope_css;
pub use slide::{ParsedSlide, SlideBlock, SlideEffects, SlideKind, SlideParser};
pub use styles::{StyleLoadError, StyleLoader, StyleTarget, StyleTask};
pub use surface::Surface;
