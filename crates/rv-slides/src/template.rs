//! Inline micro-templates.
//!
//! A fenced block whose info string is `<tag> parsed` is expanded in place
//! before markdown conversion:
//!
//! ````text
//! ```html parsed
//! <div class="banner">Raw HTML</div>
//! ```
//! ````
//!
//! The opening line must be exactly `` ```<tag> parsed `` and the closing line
//! exactly `` ``` ``. Unknown tags leave the block untouched.

use std::borrow::Cow;

use crate::convert::TemplateConverter;
use crate::scope::scope_css;

/// Opening fence of a micro-template block.
const FENCE: &str = "```";

/// Info string suffix that marks a block for expansion.
const PARSED_SUFFIX: &str = " parsed";

/// Expansion rule selected by a block's language tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MicroTemplate {
    /// Slide stylesheet; produces no inline output.
    Css,
    /// Preformatted text, HTML-escaped.
    Pre,
    /// Template language rendered through the template converter.
    Template,
    /// Raw HTML, inlined verbatim.
    Html,
    /// Unknown tag; the block stays as written.
    PassThrough,
}

impl MicroTemplate {
    pub(crate) fn from_tag(tag: &str) -> Self {
        match tag {
            "css" => Self::Css,
            "pre" => Self::Pre,
            "jinja" => Self::Template,
            "html" => Self::Html,
            _ => Self::PassThrough,
        }
    }
}

/// Result of expanding the micro-templates of one slide body.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Expansion {
    /// Body with expanded blocks substituted.
    pub(crate) body: String,
    /// Stylesheet for the slide's main style target (last `css` block wins).
    pub(crate) main_css: Option<String>,
}

/// Expand every micro-template block in `body`.
///
/// `scope` is the selector that `css` blocks are scoped to; `None` leaves
/// stylesheets global.
pub(crate) fn expand(
    body: &str,
    scope: Option<&str>,
    templates: &dyn TemplateConverter,
) -> Expansion {
    let lines: Vec<&str> = body.split('\n').collect();
    let mut out: Vec<Cow<'_, str>> = Vec::with_capacity(lines.len());
    let mut main_css = None;
    let mut i = 0;

    while i < lines.len() {
        let Some(tag) = opening_tag(lines[i]) else {
            out.push(Cow::Borrowed(lines[i]));
            i += 1;
            continue;
        };
        let Some(close) = closing_line(&lines, i) else {
            out.push(Cow::Borrowed(lines[i]));
            i += 1;
            continue;
        };

        let content = lines[i + 1..close].join("\n");
        match MicroTemplate::from_tag(tag) {
            MicroTemplate::Css => {
                main_css = Some(match scope {
                    Some(scope) => scope_css(&content, scope),
                    None => content,
                });
            }
            MicroTemplate::Pre => {
                out.push(Cow::Owned(format!(
                    "<pre>{}</pre>",
                    html_escape::encode_text(&content)
                )));
            }
            MicroTemplate::Html => out.push(Cow::Owned(content)),
            MicroTemplate::Template => match templates.render(&content) {
                Ok(html) => out.push(Cow::Owned(html)),
                Err(e) => {
                    tracing::warn!(tag, error = %e, "Template block left unexpanded");
                    out.extend(lines[i..=close].iter().copied().map(Cow::Borrowed));
                }
            },
            MicroTemplate::PassThrough => {
                out.extend(lines[i..=close].iter().copied().map(Cow::Borrowed));
            }
        }
        i = close + 1;
    }

    Expansion {
        body: out.join("\n"),
        main_css,
    }
}

/// Return the language tag if `line` opens a micro-template block.
fn opening_tag(line: &str) -> Option<&str> {
    let tag = line.strip_prefix(FENCE)?.strip_suffix(PARSED_SUFFIX)?;
    (!tag.is_empty() && !tag.chars().any(char::is_whitespace)).then_some(tag)
}

/// Find the closing fence for the block opened at `open`.
///
/// The block needs at least one content line.
fn closing_line(lines: &[&str], open: usize) -> Option<usize> {
    (open + 2..lines.len()).find(|&j| lines[j] == FENCE)
}
