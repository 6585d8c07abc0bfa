//! In-memory presentation surface.
//!
//! Holds the slide tree, globals, styles, title and theme link as plain
//! data. Used for static export (the tree is rendered to HTML once) and for
//! observing reconciler behavior: every structural mutation is recorded as a
//! [`SurfaceOp`].

use std::collections::BTreeMap;

use crate::styles::StyleTarget;
use crate::surface::Surface;

/// Structural mutation applied to the slide tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceOp {
    AppendSection,
    AppendSubSection { h: usize },
    ReplaceContainer { h: usize, v: usize },
    RemoveSubSection { h: usize, v: usize },
    RemoveSection { h: usize },
}

/// Surface backed by plain data structures.
#[derive(Debug, Default)]
pub struct MemorySurface {
    sections: Vec<Vec<String>>,
    globals: Vec<(String, String)>,
    styles: BTreeMap<StyleTarget, String>,
    title: Option<String>,
    theme_href: Option<String>,
    ops: Vec<SurfaceOp>,
    style_writes: usize,
}

impl MemorySurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Container markup of every sub-section, by section.
    #[must_use]
    pub fn sections(&self) -> &[Vec<String>] {
        &self.sections
    }

    /// Container markup of sub-section `(h, v)`.
    #[must_use]
    pub fn container(&self, h: usize, v: usize) -> Option<&str> {
        self.sections.get(h)?.get(v).map(String::as_str)
    }

    /// Global nodes in insertion order.
    #[must_use]
    pub fn globals(&self) -> &[(String, String)] {
        &self.globals
    }

    /// Content of the style element for `target`.
    #[must_use]
    pub fn style(&self, target: &StyleTarget) -> Option<&str> {
        self.styles.get(target).map(String::as_str)
    }

    /// Drain the recorded structural mutations.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of style writes since the last call, then reset.
    pub fn take_style_writes(&mut self) -> usize {
        std::mem::take(&mut self.style_writes)
    }

    /// Render the slide tree as nested `<section>` elements.
    #[must_use]
    pub fn render_slides(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str("<section>");
            for container in section {
                out.push_str("<section>");
                out.push_str(container);
                out.push_str("</section>");
            }
            out.push_str("</section>\n");
        }
        out
    }

    /// Render every style element.
    ///
    /// Elements are ordered by owning slide; text is emitted raw, so the
    /// content must not contain `</style>`.
    #[must_use]
    pub fn render_styles(&self) -> String {
        let mut out = String::new();
        for (target, css) in &self.styles {
            if css.is_empty() {
                continue;
            }
            out.push_str(&format!(
                "<style class=\"{}\" data-slide=\"{}\">{}</style>\n",
                target.class_name(),
                target.slide(),
                css.replace("</style", "<\\/style"),
            ));
        }
        out
    }

    /// Render the global nodes.
    #[must_use]
    pub fn render_globals(&self) -> String {
        self.globals
            .iter()
            .map(|(_, html)| html.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Surface for MemorySurface {
    fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn sub_section_count(&self, h: usize) -> usize {
        self.sections.get(h).map_or(0, Vec::len)
    }

    fn append_section(&mut self) {
        self.sections.push(Vec::new());
        self.ops.push(SurfaceOp::AppendSection);
    }

    fn append_sub_section(&mut self, h: usize) {
        if let Some(section) = self.sections.get_mut(h) {
            section.push(String::new());
            self.ops.push(SurfaceOp::AppendSubSection { h });
        }
    }

    fn replace_container(&mut self, h: usize, v: usize, html: &str) {
        if let Some(container) = self.sections.get_mut(h).and_then(|s| s.get_mut(v)) {
            html.clone_into(container);
            self.ops.push(SurfaceOp::ReplaceContainer { h, v });
        }
    }

    fn remove_sub_section(&mut self, h: usize, v: usize) {
        if let Some(section) = self.sections.get_mut(h)
            && v < section.len()
        {
            section.remove(v);
            self.ops.push(SurfaceOp::RemoveSubSection { h, v });
        }
    }

    fn remove_section(&mut self, h: usize) {
        if h < self.sections.len() {
            self.sections.remove(h);
            self.ops.push(SurfaceOp::RemoveSection { h });
        }
    }

    fn set_global(&mut self, key: &str, html: &str) {
        match self.globals.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => html.clone_into(existing),
            None => self.globals.push((key.to_owned(), html.to_owned())),
        }
    }

    fn remove_global(&mut self, key: &str) {
        self.globals.retain(|(k, _)| k != key);
    }

    fn set_style(&mut self, target: &StyleTarget, css: &str) {
        self.styles.insert(target.clone(), css.to_owned());
        self.style_writes += 1;
    }

    fn remove_style(&mut self, target: &StyleTarget) {
        self.styles.remove(target);
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_owned());
    }

    fn theme_href(&self) -> Option<&str> {
        self.theme_href.as_deref()
    }

    fn set_theme_href(&mut self, href: &str) {
        self.theme_href = Some(href.to_owned());
    }
}
