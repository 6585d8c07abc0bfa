//! YAML front matter.
//!
//! A document may start with a `---` line, a YAML mapping and a closing
//! `---` line. Everything after the closing line is the slide body.

use serde_json::Value;

use crate::engine::Options;

/// Front matter delimiter line.
const DELIMITER: &str = "---";

/// Front matter parse error.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    #[error("Invalid front matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Front matter must be a mapping")]
    NotMapping,
}

/// Document split into header data and body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Matter {
    pub data: Options,
    pub content: String,
}

/// Split `raw` into front matter and body.
///
/// A document without a complete front matter block has empty data and is
/// entirely content.
pub fn parse(raw: &str) -> Result<Matter, FrontMatterError> {
    let Some((yaml, content)) = split_block(raw) else {
        return Ok(Matter {
            data: Options::new(),
            content: raw.to_owned(),
        });
    };

    let data = if yaml.trim().is_empty() {
        Options::new()
    } else {
        match serde_yaml::from_str::<Value>(yaml)? {
            Value::Object(map) => map,
            Value::Null => Options::new(),
            _ => return Err(FrontMatterError::NotMapping),
        }
    };

    Ok(Matter {
        data,
        content: content.to_owned(),
    })
}

/// Split `raw` like [`parse`], falling back to empty data on invalid YAML.
pub fn parse_lenient(raw: &str) -> Matter {
    parse(raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring front matter");
        Matter {
            data: Options::new(),
            content: split_block(raw).map_or(raw, |(_, content)| content).to_owned(),
        }
    })
}

/// Render `data` as front matter followed by `content`.
///
/// Empty data produces the content alone.
pub fn stringify(content: &str, data: &Options) -> Result<String, FrontMatterError> {
    if data.is_empty() {
        return Ok(content.to_owned());
    }
    let yaml = serde_yaml::to_string(data)?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{content}"))
}

/// Locate the front matter block: `(yaml, content)`.
fn split_block(raw: &str) -> Option<(&str, &str)> {
    let rest = strip_line(raw, DELIMITER)?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let yaml = &rest[..offset];
            let content = &rest[offset + line.len()..];
            return Some((yaml, content));
        }
        offset += line.len();
    }
    None
}

/// Strip a first line equal to `expected` (with its line break).
fn strip_line<'a>(text: &'a str, expected: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(expected)?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}
