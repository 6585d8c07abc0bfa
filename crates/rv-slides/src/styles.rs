//! Slide-scoped style targets and stylesheet fetch tasks.
//!
//! Every style element a slide contributes is addressed by a
//! [`StyleTarget`]. The [`StyleTable`] tracks which targets are live after
//! the latest update; stylesheet fetches ([`StyleTask`]) run outside the
//! update and are delivered later. Delivering to a target that is no longer
//! live is a silent no-op: there is no cancellation.

use std::collections::{BTreeMap, BTreeSet};

use crate::scope::scope_css;
use crate::surface::Surface;

/// Address of a style element owned by a slide.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleTarget {
    /// Stylesheet produced by `css parsed` blocks (one per slide).
    Main {
        /// Fingerprint of the owning slide.
        slide: String,
    },
    /// Stylesheet referenced by the `index`-th `// css=` directive.
    Reference {
        /// Fingerprint of the owning slide.
        slide: String,
        /// Position of the directive among the slide's `css` values.
        index: usize,
    },
}

impl StyleTarget {
    /// Class attribute of the style element.
    pub fn class_name(&self) -> String {
        match self {
            Self::Main { .. } => "main".to_owned(),
            Self::Reference { index, .. } => format!("ref ref{index}"),
        }
    }

    /// Fingerprint of the slide owning this target.
    pub fn slide(&self) -> &str {
        match self {
            Self::Main { slide } | Self::Reference { slide, .. } => slide,
        }
    }
}

/// Pending stylesheet fetch for a `// css=` directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleTask {
    /// Style element the result is written to.
    pub target: StyleTarget,
    /// Stylesheet reference as written in the directive.
    pub reference: String,
    /// Scope selector applied to the fetched text (`None` for global slides).
    pub scope: Option<String>,
}

impl StyleTask {
    /// Turn fetched stylesheet text into the text to inject.
    pub fn prepare(&self, css: &str) -> String {
        match &self.scope {
            Some(scope) => scope_css(css, scope),
            None => css.to_owned(),
        }
    }
}

/// Stylesheet loading error.
#[derive(Debug, thiserror::Error)]
#[error("Failed to load stylesheet {reference}: {message}")]
pub struct StyleLoadError {
    /// Reference that failed to load.
    pub reference: String,
    /// Human-readable cause.
    pub message: String,
}

impl StyleLoadError {
    pub fn new(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            message: message.into(),
        }
    }
}

/// Loads the text of a referenced stylesheet.
pub trait StyleLoader {
    fn load(&self, reference: &str) -> Result<String, StyleLoadError>;
}

impl<F> StyleLoader for F
where
    F: Fn(&str) -> Result<String, StyleLoadError>,
{
    fn load(&self, reference: &str) -> Result<String, StyleLoadError> {
        self(reference)
    }
}

/// Live style targets and their current content.
#[derive(Debug, Default)]
pub(crate) struct StyleTable {
    live: BTreeMap<StyleTarget, String>,
    seen: BTreeSet<StyleTarget>,
}

impl StyleTable {
    /// Start a new update pass.
    pub(crate) fn begin(&mut self) {
        self.seen.clear();
    }

    /// Write `css` to `target` if it differs from the live content.
    pub(crate) fn set(&mut self, surface: &mut dyn Surface, target: StyleTarget, css: String) {
        self.seen.insert(target.clone());
        if self.live.get(&target) != Some(&css) {
            surface.set_style(&target, &css);
            self.live.insert(target, css);
        }
    }

    /// Keep `target` alive, creating an empty element if it is new.
    ///
    /// Existing content is kept until the next fetch result arrives.
    pub(crate) fn reserve(&mut self, surface: &mut dyn Surface, target: StyleTarget) {
        self.seen.insert(target.clone());
        if !self.live.contains_key(&target) {
            surface.set_style(&target, "");
            self.live.insert(target, String::new());
        }
    }

    /// Remove every target not touched since [`begin`](Self::begin).
    pub(crate) fn finish(&mut self, surface: &mut dyn Surface) {
        let seen = &self.seen;
        self.live.retain(|target, _| {
            let keep = seen.contains(target);
            if !keep {
                surface.remove_style(target);
            }
            keep
        });
    }

    /// Deliver fetched text; returns `false` if the target is gone.
    pub(crate) fn deliver(&mut self, surface: &mut dyn Surface, target: &StyleTarget, css: String) -> bool {
        match self.live.get_mut(target) {
            Some(content) => {
                if *content != css {
                    surface.set_style(target, &css);
                    *content = css;
                }
                true
            }
            None => false,
        }
    }
}
