//! The slide document controller.
//!
//! A [`Deck`] exclusively owns everything one loaded document mutates: the
//! previous grid, the surface, the engine driver and the live style table.
//! Every content change goes through the grid builder and the reconciler;
//! every header change goes through the header reducer.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::build::build_document;
use crate::engine::{Dependency, EngineDriver, EngineState, Location, Options, RenderingEngine};
use crate::front_matter::{self, FrontMatterError, Matter};
use crate::grid::{Grid, build_grid};
use crate::headers::{DEFAULT_THEME, HeaderReducer, THEME_KEY, TITLE_KEY, theme_from_href, theme_href};
use crate::reconcile::reconcile;
use crate::slide::SlideParser;
use crate::styles::{StyleLoader, StyleTable, StyleTask};
use crate::surface::Surface;

/// Default location of the rendering engine's assets.
pub const DEFAULT_CDN: &str = "https://cdn.jsdelivr.net/npm/reveal.js@3.8.0/";

/// Construction settings of a [`Deck`].
#[derive(Clone, Debug)]
pub struct DeckOptions {
    /// Base URL of theme stylesheets (`<base>/theme/<name>.css`).
    pub theme_base: String,
    /// Plugins passed to the engine on initialization.
    pub dependencies: Vec<Dependency>,
}

impl DeckOptions {
    /// Settings for engine assets served from `cdn`.
    pub fn with_cdn(cdn: &str) -> Self {
        let cdn = cdn.trim_end_matches('/');
        Self {
            theme_base: format!("{cdn}/css"),
            dependencies: vec![Dependency::new(
                format!("{cdn}/plugin/highlight/highlight.js"),
                true,
            )],
        }
    }
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self::with_cdn(DEFAULT_CDN)
    }
}

/// A loaded slide document bound to a surface and a rendering engine.
pub struct Deck<S, E> {
    parser: SlideParser,
    surface: S,
    engine: EngineDriver<E>,
    grid: Grid,
    markdown: String,
    reducer: HeaderReducer,
    styles: StyleTable,
    globals: BTreeMap<String, String>,
    theme_base: String,
}

impl<S: Surface, E: RenderingEngine> Deck<S, E> {
    pub fn new(surface: S, engine: E, parser: SlideParser, options: DeckOptions) -> Self {
        let mut engine = EngineDriver::new(engine, options.dependencies);
        engine.poll();
        Self {
            parser,
            surface,
            engine,
            grid: Grid::new(),
            markdown: String::new(),
            reducer: HeaderReducer::new(),
            styles: StyleTable::default(),
            globals: BTreeMap::new(),
            theme_base: options.theme_base,
        }
    }

    /// Load a split document, then move the engine to `location` if given.
    pub fn load(&mut self, matter: Matter, location: Option<Location>) -> Vec<StyleTask> {
        let tasks = self.set_markdown(&matter.content);
        self.set_headers(matter.data);
        if let Some(location) = location {
            self.engine.navigate(location);
        }
        tasks
    }

    /// Replace the whole document text (front matter and body).
    pub fn update(&mut self, raw: &str) -> Vec<StyleTask> {
        let matter = front_matter::parse_lenient(raw);
        let tasks = self.set_markdown(&matter.content);
        self.set_headers(matter.data);
        tasks
    }

    /// Current slide body text.
    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    /// Replace the slide body and reconcile the surface.
    ///
    /// Returns the stylesheet fetches requested by the new content; results
    /// are handed back through [`deliver_style`](Self::deliver_style).
    pub fn set_markdown(&mut self, text: &str) -> Vec<StyleTask> {
        let mut build = build_grid(text, &self.parser, &self.grid);
        let mut tasks = Vec::new();
        let mut live_globals = BTreeSet::new();

        self.styles.begin();
        for effects in std::mem::take(&mut build.effects) {
            if let Some((key, html)) = effects.global {
                if self.globals.get(&key) != Some(&html) {
                    self.surface.set_global(&key, &html);
                    self.globals.insert(key.clone(), html);
                }
                live_globals.insert(key);
            }
            if let Some((target, css)) = effects.main_style {
                self.styles.set(&mut self.surface, target, css);
            }
            for task in effects.fetches {
                self.styles.reserve(&mut self.surface, task.target.clone());
                tasks.push(task);
            }
        }

        let surface = &mut self.surface;
        self.globals.retain(|key, _| {
            let keep = live_globals.contains(key);
            if !keep {
                surface.remove_global(key);
            }
            keep
        });

        let stats = reconcile(&mut self.surface, &self.grid, &build);
        self.styles.finish(&mut self.surface);
        self.engine.resync();

        tracing::debug!(
            sections = build.grid.len(),
            created = stats.created,
            replaced = stats.replaced,
            removed = stats.removed,
            fetches = tasks.len(),
            "Reconciled deck"
        );

        self.grid = build.grid;
        text.clone_into(&mut self.markdown);
        tasks
    }

    /// Applied engine options.
    pub fn headers(&self) -> Options {
        self.reducer.options()
    }

    /// Apply a header assignment.
    pub fn set_headers(&mut self, headers: Options) {
        let update = self.reducer.reduce(headers);

        let href = theme_href(&self.theme_base, &update.theme);
        if self.surface.theme_href() != Some(href.as_str()) {
            self.surface.set_theme_href(&href);
        }
        if self.surface.title() != Some(update.title.as_str()) {
            self.surface.set_title(&update.title);
        }
        if let Some(options) = update.options {
            tracing::debug!(keys = options.len(), "Reconfiguring engine");
            self.engine.configure(options);
        }
    }

    /// Current theme name.
    pub fn theme(&self) -> String {
        self.surface
            .theme_href()
            .and_then(theme_from_href)
            .unwrap_or(DEFAULT_THEME)
            .to_owned()
    }

    /// Current document title.
    pub fn title(&self) -> String {
        self.surface.title().unwrap_or_default().to_owned()
    }

    /// Headers to write as front matter: applied options plus non-default
    /// theme and title.
    pub fn front_matter(&self) -> Options {
        let mut data = self.reducer.options();
        let theme = self.theme();
        if theme != DEFAULT_THEME {
            data.insert(THEME_KEY.to_owned(), Value::String(theme));
        }
        let title = self.title();
        if !title.is_empty() {
            data.insert(TITLE_KEY.to_owned(), Value::String(title));
        }
        data
    }

    /// Serialize the deck back to document text.
    pub fn build(&self) -> Result<String, FrontMatterError> {
        build_document(&self.grid, &self.front_matter())
    }

    /// Current grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Write a fetched stylesheet to its target.
    ///
    /// Returns `false` when the target is no longer live; the result is
    /// dropped in that case.
    pub fn deliver_style(&mut self, task: &StyleTask, css: &str) -> bool {
        let delivered = self
            .styles
            .deliver(&mut self.surface, &task.target, task.prepare(css));
        if !delivered {
            tracing::debug!(reference = %task.reference, "Dropping stylesheet for removed slide");
        }
        delivered
    }

    /// Run `tasks` through `loader` and deliver each result.
    ///
    /// Failed loads leave their target empty.
    pub fn load_styles(&mut self, tasks: &[StyleTask], loader: &dyn StyleLoader) {
        for task in tasks {
            match loader.load(&task.reference) {
                Ok(css) => {
                    self.deliver_style(task, &css);
                }
                Err(e) => tracing::debug!(error = %e, "Stylesheet not loaded"),
            }
        }
    }

    /// Check engine readiness; flushes queued actions on transition.
    pub fn poll_engine(&mut self) -> EngineState {
        self.engine.poll()
    }

    /// Handle a native engine readiness notification.
    pub fn notify_engine_ready(&mut self) {
        self.engine.notify_ready();
    }

    /// Move the engine to `location`.
    pub fn navigate(&mut self, location: Location) {
        self.engine.navigate(location);
    }

    pub fn engine(&self) -> &EngineDriver<E> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EngineDriver<E> {
        &mut self.engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S, E> std::fmt::Debug for Deck<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deck")
            .field("sections", &self.grid.len())
            .field("theme_base", &self.theme_base)
            .finish_non_exhaustive()
    }
}
