//! Static presentation export.
//!
//! Loads a document into a [`Deck`] backed by [`MemorySurface`] and
//! [`RecordingEngine`], then renders a self-contained reveal.js page: the
//! slide tree, style targets and global nodes become markup, and the engine
//! options recorded by the deck become the `Reveal.initialize` call.

use std::fmt::Write;

use serde_json::{Value, json};

use crate::convert::TemplateFilters;
use crate::deck::{DEFAULT_CDN, Deck, DeckOptions};
use crate::engine::{Options, RecordingEngine};
use crate::front_matter;
use crate::memory::MemorySurface;
use crate::slide::SlideParser;
use crate::styles::StyleLoader;
use crate::surface::Surface;

/// Header listing extra stylesheets for the page.
const CSS_KEY: &str = "css";
/// Header listing extra scripts for the page.
const JS_KEY: &str = "js";

/// A deck rendered without a live document.
pub type StaticDeck = Deck<MemorySurface, RecordingEngine>;

/// Export settings.
#[derive(Clone, Debug)]
pub struct ExportSettings {
    /// Base URL of the engine's assets.
    pub cdn: String,
    /// Options merged over the document's front matter.
    pub overrides: Options,
    /// Extra template filters.
    pub filters: TemplateFilters,
    /// Maps a `css`/`js` header reference to the URL used in the page.
    pub asset_url: fn(&str) -> String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            cdn: DEFAULT_CDN.to_owned(),
            overrides: Options::new(),
            filters: TemplateFilters::new(),
            asset_url: str::to_owned,
        }
    }
}

/// Load `raw` into a static deck and resolve its stylesheets through `loader`.
pub fn load_static(raw: &str, settings: &ExportSettings, loader: &dyn StyleLoader) -> StaticDeck {
    let mut matter = front_matter::parse_lenient(raw);
    matter.data.extend(settings.overrides.clone());

    let mut deck = Deck::new(
        MemorySurface::new(),
        RecordingEngine::ready(),
        SlideParser::with_filters(&settings.filters),
        DeckOptions::with_cdn(&settings.cdn),
    );
    let tasks = deck.load(matter, None);
    deck.load_styles(&tasks, loader);
    deck
}

/// Render `raw` as a static presentation page.
pub fn export(raw: &str, settings: &ExportSettings, loader: &dyn StyleLoader) -> String {
    let deck = load_static(raw, settings, loader);
    render_page(&deck, settings)
}

/// Render a loaded static deck as an HTML page.
pub fn render_page(deck: &StaticDeck, settings: &ExportSettings) -> String {
    let surface = deck.surface();
    let engine = deck.engine().engine();
    let cdn = settings.cdn.trim_end_matches('/');
    let headers = deck.headers();

    let mut html = String::with_capacity(8192);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no\">\n",
    );
    let _ = writeln!(html, "<title>{}</title>", html_escape::encode_text(&deck.title()));
    let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"{cdn}/css/reveal.css\">");
    if let Some(href) = surface.theme_href() {
        let _ = writeln!(
            html,
            "<link rel=\"stylesheet\" href=\"{}\" id=\"reveal-theme\">",
            html_escape::encode_double_quoted_attribute(href)
        );
    }
    let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"{cdn}/lib/css/zenburn.css\">");
    for href in header_assets(&headers, CSS_KEY) {
        let _ = writeln!(
            html,
            "<link rel=\"stylesheet\" href=\"{}\">",
            html_escape::encode_double_quoted_attribute(&(settings.asset_url)(&href))
        );
    }
    html.push_str("</head>\n<body>\n");

    html.push_str("<div class=\"reveal\">\n<div class=\"slides\">\n");
    html.push_str(&surface.render_slides());
    html.push_str("</div>\n</div>\n");

    html.push_str("<div id=\"global\">\n");
    html.push_str(&surface.render_styles());
    html.push_str(&surface.render_globals());
    html.push_str("\n</div>\n");

    let _ = writeln!(html, "<script src=\"{cdn}/js/reveal.js\"></script>");
    for src in header_assets(&headers, JS_KEY) {
        let _ = writeln!(
            html,
            "<script src=\"{}\"></script>",
            html_escape::encode_double_quoted_attribute(&(settings.asset_url)(&src))
        );
    }

    let mut config = engine.options().clone();
    config.remove(CSS_KEY);
    config.remove(JS_KEY);
    config.insert(
        "dependencies".to_owned(),
        Value::Array(
            engine
                .dependencies()
                .iter()
                .map(|d| json!({"src": d.src, "async": d.is_async}))
                .collect(),
        ),
    );
    let _ = writeln!(
        html,
        "<script>\nReveal.initialize({});\n</script>",
        Value::Object(config).to_string().replace("</", "<\\/")
    );
    html.push_str("</body>\n</html>\n");
    html
}

/// String or list-of-strings header values.
fn header_assets(headers: &Options, key: &str) -> Vec<String> {
    match headers.get(key) {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::StyleLoadError;
    use pretty_assertions::assert_eq;

    fn no_styles(reference: &str) -> Result<String, StyleLoadError> {
        Err(StyleLoadError::new(reference, "offline"))
    }

    fn settings() -> ExportSettings {
        ExportSettings {
            cdn: "https://cdn.example/reveal/".to_owned(),
            ..ExportSettings::default()
        }
    }

    #[test]
    fn test_export_page_structure() {
        let page = export("---\ntitle: A & B\ntheme: black\n---\n# One\n===\n# Two", &settings(), &no_styles);

        assert!(page.contains("<title>A &amp; B</title>"));
        assert!(page.contains("href=\"https://cdn.example/reveal/css/theme/black.css\" id=\"reveal-theme\""));
        assert!(page.contains("<script src=\"https://cdn.example/reveal/js/reveal.js\"></script>"));
        assert_eq!(page.matches("<section><section><div class=\"container\">").count(), 2);
        assert!(page.contains("<h1>Two</h1>"));
    }

    #[test]
    fn test_export_initialize_options() {
        let page = export("---\ncontrols: false\n---\nx", &settings(), &no_styles);
        assert!(page.contains("\"controls\":false"));
        assert!(page.contains("\"hash\":true"));
        assert!(page.contains(
            "\"dependencies\":[{\"async\":true,\"src\":\"https://cdn.example/reveal/plugin/highlight/highlight.js\"}]"
        ));
    }

    #[test]
    fn test_export_overrides_win() {
        let mut settings = settings();
        settings.overrides.insert("controls".to_owned(), json!(true));
        let deck = load_static("---\ncontrols: false\n---\nx", &settings, &no_styles);
        assert_eq!(deck.headers()["controls"], json!(true));
    }

    #[test]
    fn test_export_asset_links() {
        let mut settings = settings();
        settings.asset_url = |reference| format!("/assets/{reference}");
        let page = export(
            "---\ncss:\n  - a.css\n  - https://x/b.css\njs: c.js\n---\nx",
            &settings,
            &no_styles,
        );
        assert!(page.contains("<link rel=\"stylesheet\" href=\"/assets/a.css\">"));
        assert!(page.contains("<link rel=\"stylesheet\" href=\"/assets/https://x/b.css\">"));
        assert!(page.contains("<script src=\"/assets/c.js\"></script>"));
        assert!(!page.contains("\"css\":"));
    }

    #[test]
    fn test_export_loaded_styles_and_globals() {
        let loader = |_: &str| -> Result<String, StyleLoadError> { Ok("p{}".to_owned()) };
        let page = export("// css=s.css\nA\n===\n// global\n<b>logo</b>", &settings(), &loader);
        assert!(page.contains("<style class=\"ref ref0\""));
        assert!(page.contains(" p{}</style>"));
        assert!(page.contains("<b>logo</b>"));
    }

    #[test]
    fn test_script_close_escaped() {
        let page = export("---\nnote: \"</script>\"\n---\nx", &settings(), &no_styles);
        assert!(page.contains("<\\/script>"));
        assert_eq!(page.matches("</script>").count(), 2);
    }

    #[test]
    fn test_header_assets() {
        let mut headers = Options::new();
        headers.insert("css".to_owned(), json!(["a.css", 3]));
        assert_eq!(header_assets(&headers, "css"), vec!["a.css".to_owned()]);
        assert!(header_assets(&headers, "js").is_empty());
    }
}
