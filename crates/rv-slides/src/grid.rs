//! Document grid construction.
//!
//! The document body is split into horizontal groups on `===` lines and
//! each group into vertical slides on `--` lines. Invisible slides (hidden
//! and global) are dropped and empty groups are elided, so the resulting
//! grid is dense: the rendering engine addresses slides purely by position.

use std::sync::LazyLock;

use regex::Regex;

use crate::slide::{SlideBlock, SlideEffects, SlideParser};

/// Horizontal delimiter line.
pub const HORIZONTAL_DELIMITER: &str = "===";

/// Vertical delimiter line.
pub const VERTICAL_DELIMITER: &str = "--";

static HORIZONTAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n===[ \t]*\r?\n").unwrap());

static VERTICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n--[ \t]*\r?\n").unwrap());

/// Dense grid of visible slides, indexed `[h][v]`.
pub type Grid = Vec<Vec<SlideBlock>>;

/// Grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    pub h: usize,
    pub v: usize,
}

/// Result of building a grid against the previous one.
#[derive(Debug, Default)]
pub struct GridBuild {
    /// New dense grid.
    pub grid: Grid,
    /// Slots whose surface representation must be rebuilt, in grid order.
    pub changed: Vec<Slot>,
    /// Side effects of every parsed slide, in document order.
    pub effects: Vec<SlideEffects>,
}

/// Split a document body into groups of slide texts.
pub fn split_document(body: &str) -> Vec<Vec<&str>> {
    HORIZONTAL_RE
        .split(body)
        .map(|group| VERTICAL_RE.split(group).collect())
        .collect()
}

/// Parse `body` into a dense grid, marking slots that differ from `previous`.
///
/// A slot is unchanged when the previous grid holds a slide with the same
/// body and directives at the same position.
pub fn build_grid(body: &str, parser: &SlideParser, previous: &Grid) -> GridBuild {
    let mut build = GridBuild::default();

    for texts in split_document(body) {
        let mut group = Vec::with_capacity(texts.len());
        for text in texts {
            let parsed = parser.parse(text);
            build.effects.push(parsed.effects);
            if parsed.block.is_visible() {
                group.push(parsed.block);
            }
        }

        if group.is_empty() {
            continue;
        }

        let h = build.grid.len();
        for (v, block) in group.iter().enumerate() {
            let unchanged = previous
                .get(h)
                .and_then(|g| g.get(v))
                .is_some_and(|old| old.raw == block.raw);
            if !unchanged {
                build.changed.push(Slot { h, v });
            }
        }
        build.grid.push(group);
    }

    build
}
