//! Comment directives embedded in slide text.
//!
//! A directive is a line of the form `// key=value` or `// key`. Directive
//! lines may appear anywhere in a slide; they are removed from the body and
//! collected per key, in order of appearance.

use serde::Serialize;
use serde::ser::SerializeMap;

/// Marker that starts a directive line.
const MARKER: &str = "// ";

/// Directive values collected from a slide, keyed by directive name.
///
/// Keys keep their first-seen order so a rebuilt slide lists its directives
/// the way the author wrote them. A bare directive (`// hidden`) is stored as
/// an empty string value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directives {
    entries: Vec<(String, Vec<String>)>,
}

impl Directives {
    /// Create an empty directive set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the values of `key`.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Values of `key`, or `None` if the directive is absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Check whether the directive `key` is present (with or without a value).
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over `(key, values)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the directives back into comment lines.
    ///
    /// One line per value: `// key=value`, or `// key` when the value is empty.
    pub fn to_lines(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(key, values)| {
                values.iter().map(move |value| {
                    if value.is_empty() {
                        format!("{MARKER}{key}")
                    } else {
                        format!("{MARKER}{key}={value}")
                    }
                })
            })
            .collect()
    }
}

impl Serialize for Directives {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

/// Split slide text into its directives and the remaining body.
///
/// Non-directive lines are kept verbatim and in order, joined with `\n`.
/// A directive line without `=` is a bare directive with an empty value;
/// nothing here can fail.
///
/// # Examples
///
/// ```
/// use rv_slides::parse_directives;
///
/// let (directives, body) = parse_directives("// css=foo.css\nbody text");
/// assert_eq!(directives.get("css"), Some(&["foo.css".to_owned()][..]));
/// assert_eq!(body, "body text");
/// ```
pub fn parse_directives(text: &str) -> (Directives, String) {
    let mut directives = Directives::new();
    let mut body = Vec::new();

    for line in text.split('\n') {
        match line.strip_prefix(MARKER) {
            Some(rest) => {
                let (key, value) = rest.split_once('=').unwrap_or((rest, ""));
                directives.push(key, value);
            }
            None => body.push(line),
        }
    }

    (directives, body.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_key_value() {
        let (directives, body) = parse_directives("// css=foo.css\nbody text");

        assert_eq!(directives.get("css"), Some(&["foo.css".to_owned()][..]));
        assert_eq!(body, "body text");
    }

    #[test]
    fn test_parse_bare_directive() {
        let (directives, body) = parse_directives("a\n// hidden");

        assert_eq!(directives.get("hidden"), Some(&[String::new()][..]));
        assert!(directives.contains("hidden"));
        assert_eq!(body, "a");
    }

    #[test]
    fn test_parse_directives_anywhere() {
        let (directives, body) = parse_directives("# Title\n// global\ntext\n// css=a.css");

        assert!(directives.contains("global"));
        assert!(directives.contains("css"));
        assert_eq!(body, "# Title\ntext");
    }

    #[test]
    fn test_parse_repeated_key_collects_values() {
        let (directives, _) = parse_directives("// css=a.css\n// css=b.css");

        assert_eq!(
            directives.get("css"),
            Some(&["a.css".to_owned(), "b.css".to_owned()][..])
        );
    }

    #[test]
    fn test_parse_splits_on_first_equals() {
        let (directives, _) = parse_directives("// data=a=b");

        assert_eq!(directives.get("data"), Some(&["a=b".to_owned()][..]));
    }

    #[test]
    fn test_parse_trailing_equals_is_bare() {
        let (directives, _) = parse_directives("// key=");

        assert_eq!(directives.get("key"), Some(&[String::new()][..]));
    }

    #[test]
    fn test_marker_requires_space() {
        let (directives, body) = parse_directives("//comment\nhttp://example.com");

        assert!(directives.is_empty());
        assert_eq!(body, "//comment\nhttp://example.com");
    }

    #[test]
    fn test_body_keeps_blank_lines() {
        let (_, body) = parse_directives("\na\n\n// hidden\nb\n");

        assert_eq!(body, "\na\n\nb\n");
    }

    #[test]
    fn test_keys_keep_first_seen_order() {
        let mut directives = Directives::new();
        directives.push("global", "");
        directives.push("css", "a.css");
        directives.push("global", "x");

        let keys: Vec<&str> = directives.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["global", "css"]);
    }

    #[test]
    fn test_to_lines() {
        let (directives, _) = parse_directives("// css=a.css\n// global\n// css=b.css");

        assert_eq!(
            directives.to_lines(),
            vec!["// css=a.css", "// css=b.css", "// global"]
        );
    }

    #[test]
    fn test_serialize_as_map() {
        let (directives, _) = parse_directives("// css=a.css\n// hidden");

        let json = serde_json::to_value(&directives).unwrap();
        assert_eq!(json["css"][0], "a.css");
        assert_eq!(json["hidden"][0], "");
    }
}
