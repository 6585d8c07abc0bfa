//! Slide block parsing.
//!
//! One slide's text becomes a [`SlideBlock`] plus the side effects it asks
//! for ([`SlideEffects`]): global nodes, the slide's main stylesheet and
//! referenced stylesheets to fetch. Parsing itself never touches the
//! surface; the deck applies effects after the grid is built.

use std::sync::Arc;

use serde::Serialize;

use crate::convert::{CmarkConverter, JinjaConverter, MarkdownConverter, TemplateConverter, TemplateFilters};
use crate::directive::{Directives, parse_directives};
use crate::hash::hash;
use crate::styles::{StyleTarget, StyleTask};
use crate::template::expand;

/// Directive hiding a slide.
const HIDDEN: &str = "hidden";
/// Directive turning a slide into a global node.
const GLOBAL: &str = "global";
/// Directive referencing an external stylesheet.
const CSS: &str = "css";

/// How a slide takes part in the presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    /// Not rendered, no side effects.
    Hidden,
    /// Rendered into the outer container instead of the grid.
    Global,
    /// Ordinary slide.
    Regular,
}

/// Parsed slide.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlideBlock {
    /// Fingerprint of the full slide text, directives included.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SlideKind,
    /// Rendered slide markup; empty for hidden and global slides.
    pub html: String,
    /// Directives found in the slide.
    pub comment: Directives,
    /// Slide text with directive lines removed.
    pub raw: String,
}

impl SlideBlock {
    /// Whether the slide occupies a grid slot.
    pub fn is_visible(&self) -> bool {
        !self.html.is_empty()
    }

    /// Slide text as written by the serializer: directives first, then body.
    pub fn to_text(&self) -> String {
        if self.comment.is_empty() {
            return self.raw.clone();
        }
        let mut text = self.comment.to_lines().join("\n");
        text.push('\n');
        text.push_str(&self.raw);
        text
    }
}

/// Side effects requested by one slide.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlideEffects {
    /// Global node `(key, html)` for `// global` slides.
    pub global: Option<(String, String)>,
    /// Main stylesheet from `css parsed` blocks.
    pub main_style: Option<(StyleTarget, String)>,
    /// Referenced stylesheets to fetch.
    pub fetches: Vec<StyleTask>,
}

/// A parsed slide with its side effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedSlide {
    pub block: SlideBlock,
    pub effects: SlideEffects,
}

/// Parses slide text using pluggable markdown and template converters.
#[derive(Clone)]
pub struct SlideParser {
    markdown: Arc<dyn MarkdownConverter>,
    templates: Arc<dyn TemplateConverter>,
}

impl SlideParser {
    pub fn new(markdown: Arc<dyn MarkdownConverter>, templates: Arc<dyn TemplateConverter>) -> Self {
        Self { markdown, templates }
    }

    /// Default converters with extra template filters registered.
    pub fn with_filters(filters: &TemplateFilters) -> Self {
        let markdown: Arc<dyn MarkdownConverter> = Arc::new(CmarkConverter::new());
        let templates = Arc::new(JinjaConverter::new(Arc::clone(&markdown), filters));
        Self::new(markdown, templates)
    }

    /// Parse one slide's text.
    pub fn parse(&self, text: &str) -> ParsedSlide {
        let id = hash(text);
        let (comment, raw) = parse_directives(text);

        if comment.contains(HIDDEN) {
            return ParsedSlide {
                block: SlideBlock {
                    id,
                    kind: SlideKind::Hidden,
                    html: String::new(),
                    comment,
                    raw,
                },
                effects: SlideEffects::default(),
            };
        }

        let is_global = comment.contains(GLOBAL);
        let scope = (!is_global).then(|| format!("#{id}"));
        let mut effects = SlideEffects::default();

        if let Some(references) = comment.get(CSS) {
            effects.fetches = references
                .iter()
                .enumerate()
                .map(|(index, reference)| StyleTask {
                    target: StyleTarget::Reference {
                        slide: id.clone(),
                        index,
                    },
                    reference: reference.clone(),
                    scope: scope.clone(),
                })
                .collect();
        }

        let expansion = expand(&raw, scope.as_deref(), self.templates.as_ref());
        effects.main_style = expansion
            .main_css
            .map(|css| (StyleTarget::Main { slide: id.clone() }, css));

        let (kind, html) = if is_global {
            effects.global = Some((id.clone(), expansion.body));
            (SlideKind::Global, String::new())
        } else {
            let body = self.markdown.to_html(&expansion.body);
            (SlideKind::Regular, format!("<div id=\"{id}\">{body}</div>"))
        };

        ParsedSlide {
            block: SlideBlock {
                id,
                kind,
                html,
                comment,
                raw,
            },
            effects,
        }
    }
}

impl Default for SlideParser {
    fn default() -> Self {
        Self::with_filters(&TemplateFilters::new())
    }
}

impl std::fmt::Debug for SlideParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlideParser").finish_non_exhaustive()
    }
}
