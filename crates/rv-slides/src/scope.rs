//! Stylesheet scoping.
//!
//! Prefixes every selector of a stylesheet with a scope selector (`#<id>`)
//! so slide-local styles only apply inside that slide's container.
//!
//! Rules inside grouping at-rules (`@media`, `@supports`, `@container`,
//! `@layer`, `@document`) are scoped recursively. Other at-rule blocks
//! (`@keyframes`, `@font-face`, `@page`, ...) and statements (`@import`) are
//! copied unchanged. Root selectors (`html`, `body`, `:root`, `:host`) are
//! replaced by the scope itself.

/// At-rules whose blocks contain ordinary style rules.
const GROUPING_AT_RULES: &[&str] = &["media", "supports", "container", "layer", "document"];

/// Selectors that address the document root and map onto the scope.
const ROOT_SELECTORS: &[&str] = &["html", "body", ":root", ":host"];

/// Scope every selector in `css` under `scope`.
///
/// # Examples
///
/// ```
/// use rv_slides::scope_css;
///
/// assert_eq!(scope_css("h1 { color: red }", "#abc"), "#abc h1 { color: red }");
/// ```
pub fn scope_css(css: &str, scope: &str) -> String {
    let mut out = String::with_capacity(css.len() + css.len() / 4);
    let mut rest = css;
    scope_block(&mut rest, scope, &mut out);
    out
}

/// Scope rules until the end of input or the `}` closing the current block.
///
/// On return `rest` points just past the closing brace (if any).
fn scope_block(rest: &mut &str, scope: &str, out: &mut String) {
    loop {
        let Some((prelude, delim)) = take_prelude(rest, out) else {
            return;
        };

        match delim {
            '}' => {
                out.push_str(prelude);
                out.push('}');
                return;
            }
            ';' => {
                out.push_str(prelude);
                out.push(';');
            }
            _ => {
                let selector = prelude.trim();
                let leading = &prelude[..prelude.len() - prelude.trim_start().len()];
                let trailing = &prelude[prelude.trim_end().len()..];
                out.push_str(leading);

                if let Some(at_rule) = selector.strip_prefix('@') {
                    out.push_str(selector);
                    out.push_str(trailing);
                    out.push('{');
                    let name = at_rule
                        .split(|c: char| c.is_whitespace() || c == '(')
                        .next()
                        .unwrap_or_default()
                        .to_ascii_lowercase();
                    if GROUPING_AT_RULES.contains(&name.as_str()) {
                        scope_block(rest, scope, out);
                    } else {
                        copy_block(rest, out);
                    }
                } else {
                    out.push_str(&scope_selector_list(selector, scope));
                    out.push_str(trailing);
                    out.push('{');
                    copy_block(rest, out);
                }
            }
        }
    }
}

/// Read up to the next `{`, `}` or `;` outside comments and strings.
///
/// Comments are copied to `out` directly and excluded from the prelude.
/// Returns `None` (after copying the remainder) when no delimiter is left.
fn take_prelude<'a>(rest: &mut &'a str, out: &mut String) -> Option<(&'a str, char)> {
    loop {
        let input = *rest;
        let comment_start = input.find("/*");
        let delim = find_delimiter(input, &['{', '}', ';']);

        match (comment_start, delim) {
            (Some(c), Some((d, _))) if c < d => {
                // Only whitespace may precede a comment we lift out of a prelude;
                // otherwise keep the comment inline with the selector text.
                let end = input[c + 2..].find("*/").map_or(input.len(), |e| c + 2 + e + 2);
                if input[..c].trim().is_empty() {
                    out.push_str(&input[..end]);
                    *rest = &input[end..];
                    continue;
                }
                let (d, ch) = find_delimiter_from(input, end, &['{', '}', ';'])?;
                *rest = &input[d + 1..];
                return Some((&input[..d], ch));
            }
            (_, Some((d, ch))) => {
                *rest = &input[d + 1..];
                return Some((&input[..d], ch));
            }
            (_, None) => {
                out.push_str(input);
                *rest = "";
                return None;
            }
        }
    }
}

/// Copy a block body verbatim up to and including its matching `}`.
fn copy_block(rest: &mut &str, out: &mut String) {
    let input = *rest;
    let mut depth = 1usize;
    let mut pos = 0;

    while let Some((idx, ch)) = find_delimiter_from(input, pos, &['{', '}']) {
        pos = idx + 1;
        if ch == '{' {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                out.push_str(&input[..pos]);
                *rest = &input[pos..];
                return;
            }
        }
    }

    out.push_str(input);
    *rest = "";
}

fn find_delimiter(input: &str, delims: &[char]) -> Option<(usize, char)> {
    find_delimiter_from(input, 0, delims)
}

/// Find the next delimiter at or after `start`, skipping quoted strings and comments.
fn find_delimiter_from(input: &str, start: usize, delims: &[char]) -> Option<(usize, char)> {
    let mut chars = input[start..].char_indices().map(|(i, c)| (i + start, c));
    while let Some((i, c)) = chars.next() {
        match c {
            '"' | '\'' => {
                let mut escaped = false;
                for (_, inner) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if inner == '\\' {
                        escaped = true;
                    } else if inner == c {
                        break;
                    }
                }
            }
            '/' if input[i..].starts_with("/*") => {
                let end = input[i + 2..].find("*/").map_or(input.len(), |e| i + 2 + e + 2);
                for (j, _) in chars.by_ref() {
                    if j + 1 >= end {
                        break;
                    }
                }
            }
            c if delims.contains(&c) => return Some((i, c)),
            _ => {}
        }
    }
    None
}

/// Scope each selector of a comma-separated list.
fn scope_selector_list(list: &str, scope: &str) -> String {
    split_selectors(list)
        .into_iter()
        .map(|selector| scope_selector(selector.trim(), scope))
        .collect::<Vec<_>>()
        .join(", ")
}

fn scope_selector(selector: &str, scope: &str) -> String {
    if selector.is_empty() || selector.starts_with(scope) {
        return selector.to_owned();
    }

    for root in ROOT_SELECTORS {
        if let Some(tail) = selector.strip_prefix(root) {
            let boundary = tail
                .chars()
                .next()
                .is_none_or(|c| !(c.is_alphanumeric() || c == '-' || c == '_'));
            if boundary {
                return format!("{scope}{tail}");
            }
        }
    }

    format!("{scope} {selector}")
}

/// Split a selector list on top-level commas (not inside parentheses or brackets).
fn split_selectors(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in list.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scope_simple_rule() {
        assert_eq!(scope_css("h1 { color: red }", "#s"), "#s h1 { color: red }");
    }

    #[test]
    fn test_scope_selector_list() {
        assert_eq!(
            scope_css("h1, h2 .a{color:red}", "#s"),
            "#s h1, #s h2 .a{color:red}"
        );
    }

    #[test]
    fn test_scope_multiple_rules() {
        let css = "p { margin: 0; }\n.note { color: blue; }\n";
        assert_eq!(
            scope_css(css, "#s"),
            "#s p { margin: 0; }\n#s .note { color: blue; }\n"
        );
    }

    #[test]
    fn test_scope_root_selectors() {
        assert_eq!(
            scope_css("body { background: #000 }", "#s"),
            "#s { background: #000 }"
        );
        assert_eq!(scope_css(":root{--a:1}", "#s"), "#s{--a:1}");
        assert_eq!(scope_css("html.dark p{}", "#s"), "#s.dark p{}");
    }

    #[test]
    fn test_root_prefix_needs_boundary() {
        assert_eq!(scope_css("bodytext{}", "#s"), "#s bodytext{}");
    }

    #[test]
    fn test_scope_media_recurses() {
        let css = "@media (max-width: 600px) { h1 { font-size: 1em } }";
        assert_eq!(
            scope_css(css, "#s"),
            "@media (max-width: 600px) { #s h1 { font-size: 1em } }"
        );
    }

    #[test]
    fn test_keyframes_untouched() {
        let css = "@keyframes spin { from { opacity: 0 } to { opacity: 1 } }";
        assert_eq!(scope_css(css, "#s"), css);
    }

    #[test]
    fn test_font_face_untouched() {
        let css = "@font-face { font-family: X; src: url(x.woff) }\np{}";
        assert_eq!(
            scope_css(css, "#s"),
            "@font-face { font-family: X; src: url(x.woff) }\n#s p{}"
        );
    }

    #[test]
    fn test_import_statement_untouched() {
        let css = "@import url('a.css');\nh1{}";
        assert_eq!(scope_css(css, "#s"), "@import url('a.css');\n#s h1{}");
    }

    #[test]
    fn test_comment_before_rule() {
        let css = "/* heading */\nh1{}";
        assert_eq!(scope_css(css, "#s"), "/* heading */\n#s h1{}");
    }

    #[test]
    fn test_braces_in_strings_ignored() {
        let css = "a[title=\"{x}\"]{content:\"}\"}";
        assert_eq!(scope_css(css, "#s"), "#s a[title=\"{x}\"]{content:\"}\"}");
    }

    #[test]
    fn test_pseudo_with_commas_not_split() {
        assert_eq!(
            scope_css(":is(h1, h2){}", "#s"),
            "#s :is(h1, h2){}"
        );
    }

    #[test]
    fn test_already_scoped_unchanged() {
        assert_eq!(scope_css("#s h1{}", "#s"), "#s h1{}");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(scope_css("", "#s"), "");
    }
}
