//! Presentation surface abstraction.
//!
//! The surface is the live visual tree the rendering engine reads from:
//! horizontal sections, each holding vertical sub-sections, each holding one
//! content container. It is addressed purely by position, which is why the
//! grid handed to it must be dense.
//!
//! Besides the slide tree the surface owns the outer shell: global nodes
//! (from `// global` slides), style targets, the document title and the
//! theme stylesheet link.

use crate::styles::StyleTarget;

/// Mutable presentation surface driven by the reconciler.
pub trait Surface {
    /// Number of horizontal sections.
    fn section_count(&self) -> usize;

    /// Number of sub-sections in section `h` (0 if the section does not exist).
    fn sub_section_count(&self, h: usize) -> usize;

    /// Append an empty section after the existing ones.
    fn append_section(&mut self);

    /// Append an empty sub-section at the end of section `h`.
    fn append_sub_section(&mut self, h: usize);

    /// Replace the content container of sub-section `(h, v)` with `html`.
    ///
    /// Any previous container is discarded; the sub-section itself is kept.
    /// Implementations backed by a live document re-run syntax highlighting
    /// over code regions of the new container that are not highlighted yet.
    fn replace_container(&mut self, h: usize, v: usize, html: &str);

    /// Remove sub-section `(h, v)`; later sub-sections shift down.
    fn remove_sub_section(&mut self, h: usize, v: usize);

    /// Remove section `h` with all its sub-sections; later sections shift down.
    fn remove_section(&mut self, h: usize);

    /// Insert or replace the global node `key` at the end of the outer container.
    fn set_global(&mut self, key: &str, html: &str);

    /// Remove the global node `key` if present.
    fn remove_global(&mut self, key: &str);

    /// Create or overwrite the style element for `target`.
    fn set_style(&mut self, target: &StyleTarget, css: &str);

    /// Remove the style element for `target` if present.
    fn remove_style(&mut self, target: &StyleTarget);

    /// Current document title, `None` if there is no title element.
    fn title(&self) -> Option<&str>;

    /// Set the document title, creating the title element if needed.
    fn set_title(&mut self, title: &str);

    /// Current href of the theme stylesheet link.
    fn theme_href(&self) -> Option<&str>;

    /// Point the theme stylesheet link at `href`.
    fn set_theme_href(&mut self, href: &str);
}
