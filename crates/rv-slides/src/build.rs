//! Grid serialization.
//!
//! Rebuilds document text from a grid: each slide is written as its
//! directive lines followed by its body, slides are joined with `--` lines
//! and groups with `===` lines. Parsing the result yields the same bodies,
//! directives and kinds at every slot.

use crate::engine::Options;
use crate::front_matter::{self, FrontMatterError};
use crate::grid::{Grid, HORIZONTAL_DELIMITER, VERTICAL_DELIMITER};
use crate::slide::SlideBlock;

/// Serialize the slide body of `grid`.
pub fn build_body(grid: &Grid) -> String {
    let vertical = format!("\n{VERTICAL_DELIMITER}\n");
    let horizontal = format!("\n{HORIZONTAL_DELIMITER}\n");

    grid.iter()
        .map(|group| {
            group
                .iter()
                .map(SlideBlock::to_text)
                .collect::<Vec<_>>()
                .join(&vertical)
        })
        .collect::<Vec<_>>()
        .join(&horizontal)
}

/// Serialize `grid` with `headers` as front matter.
pub fn build_document(grid: &Grid, headers: &Options) -> Result<String, FrontMatterError> {
    front_matter::stringify(&build_body(grid), headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_grid;
    use crate::slide::{SlideKind, SlideParser};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn grid(body: &str) -> Grid {
        build_grid(body, &SlideParser::default(), &Grid::new()).grid
    }

    /// `(raw, comment lines, kind)` of every slot.
    fn shape(grid: &Grid) -> Vec<Vec<(String, Vec<String>, SlideKind)>> {
        grid.iter()
            .map(|g| {
                g.iter()
                    .map(|b| (b.raw.clone(), b.comment.to_lines(), b.kind))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_build_body() {
        let g = grid("a\n// note=x\n--\nb\n===\nc");
        assert_eq!(build_body(&g), "// note=x\na\n--\nb\n===\nc");
    }

    #[test]
    fn test_build_drops_invisible_slides() {
        let g = grid("a\n===\n// hidden\nb\n===\n// global\nc");
        assert_eq!(build_body(&g), "a");
    }

    #[test]
    fn test_bare_directive_written_bare() {
        let g = grid("// fragment\n// css=a.css\nx");
        assert_eq!(build_body(&g), "// fragment\n// css=a.css\nx");
    }

    #[test]
    fn test_round_trip_preserves_slots() {
        let text = "intro\n// note=first\n--\n// css=a.css\n// css=b.css\nmore\n===\n// hidden\ngone\n===\nend\n";
        let first = grid(text);
        let rebuilt = grid(&build_body(&first));
        assert_eq!(shape(&rebuilt), shape(&first));
        assert_eq!(build_body(&rebuilt), build_body(&first));
    }

    #[test]
    fn test_build_document_with_headers() {
        let g = grid("a");
        let mut headers = Options::new();
        headers.insert("hash".to_owned(), json!(true));
        assert_eq!(build_document(&g, &headers).unwrap(), "---\nhash: true\n---\na");
    }
}
