//! Markdown and template converters.
//!
//! The slide parser delegates all markup conversion to these traits:
//! - [`MarkdownConverter`]: markdown text to HTML ([`CmarkConverter`])
//! - [`TemplateConverter`]: template text to HTML ([`JinjaConverter`]), with a
//!   `markdown` filter and caller-registered filters from [`TemplateFilters`]

use std::collections::BTreeMap;
use std::sync::Arc;

use minijinja::{Environment, Value, context};
use pulldown_cmark::{Options, Parser, html};

/// Converts markdown text to HTML.
pub trait MarkdownConverter: Send + Sync {
    /// Convert `markdown` to HTML. Blank input yields an empty string.
    fn to_html(&self, markdown: &str) -> String;
}

/// Converts template text to HTML.
pub trait TemplateConverter: Send + Sync {
    /// Render `source` to HTML.
    fn render(&self, source: &str) -> Result<String, TemplateError>;
}

/// Template rendering error.
#[derive(Debug, thiserror::Error)]
#[error("Template error: {0}")]
pub struct TemplateError(#[from] minijinja::Error);

/// Markdown converter backed by pulldown-cmark.
#[derive(Clone, Debug)]
pub struct CmarkConverter {
    gfm: bool,
}

impl CmarkConverter {
    /// Create a converter with GitHub Flavored Markdown enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { gfm: true }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM adds tables, strikethrough, task lists and blockquote tags.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }
}

impl Default for CmarkConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownConverter for CmarkConverter {
    fn to_html(&self, markdown: &str) -> String {
        if markdown.trim().is_empty() {
            return String::new();
        }

        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, Parser::new_ext(markdown, self.parser_options()));
        output
    }
}

/// A named template filter: receives the filtered text, returns HTML.
pub type FilterFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Registry of template filter extensions.
///
/// Filters registered here are available to every template block in
/// addition to the built-in `markdown` filter. A registered filter named
/// `markdown` replaces the built-in one.
#[derive(Clone, Default)]
pub struct TemplateFilters {
    filters: BTreeMap<String, FilterFn>,
}

impl TemplateFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a filter under `name`, replacing any previous one.
    #[must_use]
    pub fn with_filter(
        mut self,
        name: impl Into<String>,
        filter: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.filters.insert(name.into(), Arc::new(filter));
        self
    }

    /// Iterate over registered filters by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterFn)> {
        self.filters.iter().map(|(name, f)| (name.as_str(), f))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl std::fmt::Debug for TemplateFilters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.filters.keys()).finish()
    }
}

/// Template converter backed by minijinja.
///
/// Filter output is marked safe, so HTML produced by `markdown` (or any
/// extension filter) is inserted without escaping.
pub struct JinjaConverter {
    env: Environment<'static>,
}

impl JinjaConverter {
    /// Create a converter whose `markdown` filter uses `markdown`.
    #[must_use]
    pub fn new(markdown: Arc<dyn MarkdownConverter>, filters: &TemplateFilters) -> Self {
        let mut env = Environment::new();

        env.add_filter("markdown", move |value: String| -> Value {
            Value::from_safe_string(markdown.to_html(&value))
        });

        for (name, filter) in filters.iter() {
            let filter = Arc::clone(filter);
            env.add_filter(name.to_owned(), move |value: String| -> Value {
                Value::from_safe_string(filter(&value))
            });
        }

        Self { env }
    }
}

impl TemplateConverter for JinjaConverter {
    fn render(&self, source: &str) -> Result<String, TemplateError> {
        Ok(self.env.render_str(source, context! {})?)
    }
}
