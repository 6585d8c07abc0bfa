//! Surface reconciliation.
//!
//! Applies a [`GridBuild`] to the surface with minimal mutations: changed
//! slots get a fresh container, missing sections and sub-sections are
//! appended, and positions absent from the new grid are removed.

use crate::grid::{Grid, GridBuild};
use crate::surface::Surface;

/// Wrap slide markup in the visual container placed in a sub-section.
pub fn container_html(html: &str) -> String {
    format!("<div class=\"container\">{html}</div>")
}

/// Mutation counts of one reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub created: usize,
    pub replaced: usize,
    pub removed: usize,
}

impl ReconcileStats {
    pub fn is_empty(&self) -> bool {
        self.created == 0 && self.replaced == 0 && self.removed == 0
    }
}

/// Bring `surface` from `previous` to the grid in `build`.
///
/// Removals run in descending order, sub-sections before their section, so
/// positions still to be visited are never shifted.
pub fn reconcile(surface: &mut dyn Surface, previous: &Grid, build: &GridBuild) -> ReconcileStats {
    let mut stats = ReconcileStats::default();

    for slot in &build.changed {
        let Some(block) = build.grid.get(slot.h).and_then(|g| g.get(slot.v)) else {
            continue;
        };
        while surface.section_count() <= slot.h {
            surface.append_section();
            stats.created += 1;
        }
        while surface.sub_section_count(slot.h) <= slot.v {
            surface.append_sub_section(slot.h);
            stats.created += 1;
        }
        surface.replace_container(slot.h, slot.v, &container_html(&block.html));
        stats.replaced += 1;
    }

    for h in (0..previous.len()).rev() {
        match build.grid.get(h) {
            None => {
                surface.remove_section(h);
                stats.removed += 1;
            }
            Some(group) => {
                for v in (group.len()..previous[h].len()).rev() {
                    surface.remove_sub_section(h, v);
                    stats.removed += 1;
                }
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_grid;
    use crate::memory::{MemorySurface, SurfaceOp};
    use crate::slide::SlideParser;
    use pretty_assertions::assert_eq;

    /// Run one update and return the recorded surface operations.
    fn update(surface: &mut MemorySurface, grid: &mut Grid, body: &str) -> Vec<SurfaceOp> {
        let build = build_grid(body, &SlideParser::default(), grid);
        reconcile(surface, grid, &build);
        *grid = build.grid;
        surface.take_ops()
    }

    #[test]
    fn test_first_render_appends() {
        let mut surface = MemorySurface::new();
        let mut grid = Grid::new();
        let ops = update(&mut surface, &mut grid, "a\n--\nb\n===\nc");

        assert_eq!(
            ops,
            vec![
                SurfaceOp::AppendSection,
                SurfaceOp::AppendSubSection { h: 0 },
                SurfaceOp::ReplaceContainer { h: 0, v: 0 },
                SurfaceOp::AppendSubSection { h: 0 },
                SurfaceOp::ReplaceContainer { h: 0, v: 1 },
                SurfaceOp::AppendSection,
                SurfaceOp::AppendSubSection { h: 1 },
                SurfaceOp::ReplaceContainer { h: 1, v: 0 },
            ]
        );
        let container = surface.container(1, 0).unwrap();
        assert!(container.starts_with("<div class=\"container\"><div id=\""));
        assert!(container.contains("<p>c</p>"));
    }

    #[test]
    fn test_unchanged_document_is_untouched() {
        let mut surface = MemorySurface::new();
        let mut grid = Grid::new();
        update(&mut surface, &mut grid, "a\n--\nb\n===\nc");
        assert!(update(&mut surface, &mut grid, "a\n--\nb\n===\nc").is_empty());
    }

    #[test]
    fn test_edit_replaces_single_container() {
        let mut surface = MemorySurface::new();
        let mut grid = Grid::new();
        update(&mut surface, &mut grid, "a\n--\nb");
        let ops = update(&mut surface, &mut grid, "a\n--\nB");
        assert_eq!(ops, vec![SurfaceOp::ReplaceContainer { h: 0, v: 1 }]);
    }

    #[test]
    fn test_directive_only_edit_leaves_surface() {
        let mut surface = MemorySurface::new();
        let mut grid = Grid::new();
        update(&mut surface, &mut grid, "a\n--\nb");
        let ops = update(&mut surface, &mut grid, "a\n--\n// note=x\nb");
        assert!(ops.is_empty());
        assert!(grid[0][1].comment.contains("note"));
    }

    #[test]
    fn test_hiding_removes_slot() {
        let mut surface = MemorySurface::new();
        let mut grid = Grid::new();
        update(&mut surface, &mut grid, "a\n--\nb");
        let ops = update(&mut surface, &mut grid, "a\n--\n// hidden\nb");
        assert_eq!(ops, vec![SurfaceOp::RemoveSubSection { h: 0, v: 1 }]);
        assert_eq!(surface.sub_section_count(0), 1);
    }

    #[test]
    fn test_shrinking_removes_descending() {
        let mut surface = MemorySurface::new();
        let mut grid = Grid::new();
        update(&mut surface, &mut grid, "a\n--\nb\n--\nc\n===\nd\n===\ne");
        let ops = update(&mut surface, &mut grid, "a");
        assert_eq!(
            ops,
            vec![
                SurfaceOp::RemoveSection { h: 2 },
                SurfaceOp::RemoveSection { h: 1 },
                SurfaceOp::RemoveSubSection { h: 0, v: 2 },
                SurfaceOp::RemoveSubSection { h: 0, v: 1 },
            ]
        );
        assert_eq!(surface.section_count(), 1);
        assert_eq!(surface.sub_section_count(0), 1);
    }

    #[test]
    fn test_growing_appends_after_existing() {
        let mut surface = MemorySurface::new();
        let mut grid = Grid::new();
        update(&mut surface, &mut grid, "a");
        let ops = update(&mut surface, &mut grid, "a\n--\nb\n===\nc");
        assert_eq!(
            ops,
            vec![
                SurfaceOp::AppendSubSection { h: 0 },
                SurfaceOp::ReplaceContainer { h: 0, v: 1 },
                SurfaceOp::AppendSection,
                SurfaceOp::AppendSubSection { h: 1 },
                SurfaceOp::ReplaceContainer { h: 1, v: 0 },
            ]
        );
    }

    #[test]
    fn test_stats() {
        let mut surface = MemorySurface::new();
        let build = build_grid("a\n--\nb", &SlideParser::default(), &Grid::new());
        let stats = reconcile(&mut surface, &Grid::new(), &build);
        assert_eq!(
            stats,
            ReconcileStats {
                created: 3,
                replaced: 2,
                removed: 0
            }
        );
        assert!(!stats.is_empty());
    }
}
