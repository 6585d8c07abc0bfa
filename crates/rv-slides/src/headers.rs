//! Presentation header reduction.
//!
//! Headers are the front matter of a document. `theme` and `title` are
//! shell settings applied to the surface; every other key is an engine
//! option, merged over [`default_options`]. An engine reconfiguration is
//! only issued when the merged options differ from the applied ones.

use serde_json::{Value, json};

use crate::engine::Options;

/// Header holding the theme name.
pub const THEME_KEY: &str = "theme";
/// Header holding the document title.
pub const TITLE_KEY: &str = "title";

/// Theme used when the headers name none.
pub const DEFAULT_THEME: &str = "white";

/// Options every deck starts from.
pub fn default_options() -> Options {
    let mut options = Options::new();
    options.insert("slideNumber".to_owned(), json!(true));
    options.insert("hash".to_owned(), json!(true));
    options
}

/// Outcome of reducing one header assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderUpdate {
    pub theme: String,
    pub title: String,
    /// Merged options when they differ from the applied ones.
    pub options: Option<Options>,
}

/// Tracks the currently applied engine options.
#[derive(Debug, Default)]
pub struct HeaderReducer {
    applied: Option<Options>,
}

impl HeaderReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applied options, or the defaults before the first assignment.
    pub fn options(&self) -> Options {
        self.applied.clone().unwrap_or_else(default_options)
    }

    /// Reduce a header assignment.
    pub fn reduce(&mut self, mut headers: Options) -> HeaderUpdate {
        let theme = take_text(&mut headers, THEME_KEY).unwrap_or_else(|| DEFAULT_THEME.to_owned());
        let title = take_text(&mut headers, TITLE_KEY).unwrap_or_default();

        let mut merged = default_options();
        merged.extend(headers);

        let options = if self.applied.as_ref() == Some(&merged) {
            None
        } else {
            self.applied = Some(merged.clone());
            Some(merged)
        };

        HeaderUpdate {
            theme,
            title,
            options,
        }
    }
}

/// Remove `key` and render its value as text; empty and null yield `None`.
fn take_text(headers: &mut Options, key: &str) -> Option<String> {
    let text = match headers.remove(key)? {
        Value::Null => return None,
        Value::String(s) => s,
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Href of the stylesheet for `theme` under `base`.
pub fn theme_href(base: &str, theme: &str) -> String {
    format!("{}/theme/{theme}.css", base.trim_end_matches('/'))
}

/// Theme name from a stylesheet href built by [`theme_href`].
pub fn theme_from_href(href: &str) -> Option<&str> {
    let file = href.rsplit('/').next()?;
    file.strip_suffix(".css").filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn headers(value: Value) -> Options {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test headers must be an object"),
        }
    }

    #[test]
    fn test_defaults() {
        let update = HeaderReducer::new().reduce(Options::new());
        assert_eq!(update.theme, "white");
        assert_eq!(update.title, "");
        assert_eq!(update.options, Some(default_options()));
    }

    #[test]
    fn test_theme_and_title_extracted() {
        let update = HeaderReducer::new().reduce(headers(json!({
            "theme": "black",
            "title": "Talk",
            "controls": false,
        })));
        assert_eq!(update.theme, "black");
        assert_eq!(update.title, "Talk");
        let options = update.options.unwrap();
        assert!(!options.contains_key("theme"));
        assert!(!options.contains_key("title"));
        assert_eq!(options["controls"], json!(false));
        assert_eq!(options["hash"], json!(true));
    }

    #[test]
    fn test_override_defaults() {
        let update = HeaderReducer::new().reduce(headers(json!({"slideNumber": false})));
        assert_eq!(update.options.unwrap()["slideNumber"], json!(false));
    }

    #[test]
    fn test_unchanged_options_skip() {
        let mut reducer = HeaderReducer::new();
        reducer.reduce(headers(json!({"a": 1, "b": 2})));
        let update = reducer.reduce(headers(json!({"b": 2, "a": 1, "title": "New"})));
        assert_eq!(update.options, None);
        assert_eq!(update.title, "New");
    }

    #[test]
    fn test_changed_options_stored() {
        let mut reducer = HeaderReducer::new();
        reducer.reduce(headers(json!({"a": 1})));
        let update = reducer.reduce(headers(json!({"a": 2})));
        assert!(update.options.is_some());
        assert_eq!(reducer.options()["a"], json!(2));
    }

    #[test]
    fn test_non_string_theme() {
        let update = HeaderReducer::new().reduce(headers(json!({"theme": 11, "title": null})));
        assert_eq!(update.theme, "11");
        assert_eq!(update.title, "");
    }

    #[test]
    fn test_theme_href_round_trip() {
        let href = theme_href("https://cdn.example/reveal/css/", "night");
        assert_eq!(href, "https://cdn.example/reveal/css/theme/night.css");
        assert_eq!(theme_from_href(&href), Some("night"));
        assert_eq!(theme_from_href("https://cdn.example/x"), None);
    }
}
