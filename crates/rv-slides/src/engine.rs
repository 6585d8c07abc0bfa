//! Rendering engine driver.
//!
//! The rendering engine is an external collaborator that may not be ready
//! when the deck starts issuing commands. [`EngineDriver`] wraps it in a
//! two-state machine: while not ready, configuration and navigation
//! requests are queued; on the transition to ready the engine is
//! initialized, every queued request runs in enqueue order and the engine
//! re-syncs once.

use std::collections::VecDeque;

use serde::Serialize;

/// Engine configuration options.
///
/// A sorted map, so two option sets compare equal regardless of the order
/// their keys were written in.
pub type Options = serde_json::Map<String, serde_json::Value>;

/// Engine plugin loaded at initialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dependency {
    /// Script location.
    pub src: String,
    /// Load without blocking the engine.
    #[serde(rename = "async")]
    pub is_async: bool,
}

impl Dependency {
    pub fn new(src: impl Into<String>, is_async: bool) -> Self {
        Self {
            src: src.into(),
            is_async,
        }
    }
}

/// Engine position; `None` keeps the current index on that axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub h: Option<usize>,
    pub v: Option<usize>,
    pub f: Option<usize>,
}

impl Location {
    pub fn new(h: usize, v: usize) -> Self {
        Self {
            h: Some(h),
            v: Some(v),
            f: None,
        }
    }
}

/// Capabilities required from the presentation rendering engine.
pub trait RenderingEngine {
    /// Whether the engine can accept commands.
    fn is_ready(&self) -> bool;

    /// Start the engine with its plugins.
    fn initialize(&mut self, dependencies: &[Dependency]);

    /// Apply configuration options.
    fn configure(&mut self, options: &Options);

    /// Navigate; `None` on every axis re-evaluates the current position.
    fn slide(&mut self, location: Location);

    /// Re-measure after structural changes.
    fn sync(&mut self);
}

/// Readiness of the wrapped engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    NotReady,
    Ready,
}

/// Request deferred until the engine is ready.
#[derive(Clone, Debug, PartialEq)]
enum PendingAction {
    Configure(Options),
    Navigate(Location),
}

/// State machine around a [`RenderingEngine`].
#[derive(Debug)]
pub struct EngineDriver<E> {
    engine: E,
    state: EngineState,
    dependencies: Vec<Dependency>,
    pending: VecDeque<PendingAction>,
}

impl<E: RenderingEngine> EngineDriver<E> {
    pub fn new(engine: E, dependencies: Vec<Dependency>) -> Self {
        Self {
            engine,
            state: EngineState::NotReady,
            dependencies,
            pending: VecDeque::new(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Number of queued actions.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Reconfigure the engine, or queue the request until it is ready.
    pub fn configure(&mut self, options: Options) {
        match self.state {
            EngineState::Ready => {
                self.engine.configure(&options);
                self.resync();
            }
            EngineState::NotReady => self.pending.push_back(PendingAction::Configure(options)),
        }
    }

    /// Navigate to `location`, or queue the request until the engine is ready.
    pub fn navigate(&mut self, location: Location) {
        match self.state {
            EngineState::Ready => {
                self.engine.slide(location);
                self.engine.sync();
            }
            EngineState::NotReady => self.pending.push_back(PendingAction::Navigate(location)),
        }
    }

    /// Re-evaluate the current position after structural changes.
    ///
    /// Does nothing while the engine is not ready: the transition re-syncs.
    pub fn resync(&mut self) {
        if self.state == EngineState::Ready {
            self.engine.slide(Location::default());
            self.engine.sync();
        }
    }

    /// Check engine readiness and transition if it became ready.
    pub fn poll(&mut self) -> EngineState {
        if self.state == EngineState::NotReady && self.engine.is_ready() {
            self.transition();
        }
        self.state
    }

    /// Transition on a native readiness notification.
    pub fn notify_ready(&mut self) {
        if self.state == EngineState::NotReady {
            self.transition();
        }
    }

    fn transition(&mut self) {
        self.engine.initialize(&self.dependencies);
        self.state = EngineState::Ready;
        tracing::debug!(pending = self.pending.len(), "Rendering engine ready");

        while let Some(action) = self.pending.pop_front() {
            match action {
                PendingAction::Configure(options) => self.engine.configure(&options),
                PendingAction::Navigate(location) => self.engine.slide(location),
            }
        }
        self.engine.slide(Location::default());
        self.engine.sync();
    }
}

/// Engine call recorded by [`RecordingEngine`].
#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    Initialize(Vec<Dependency>),
    Configure(Options),
    Slide(Location),
    Sync,
}

/// Engine that records calls instead of rendering.
///
/// Serves as the engine of a static export (the recorded configuration is
/// emitted into the page) and as an observable engine in tests.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    ready: bool,
    calls: Vec<EngineCall>,
    options: Options,
    dependencies: Vec<Dependency>,
}

impl RecordingEngine {
    /// Engine that reports ready immediately.
    pub fn ready() -> Self {
        Self {
            ready: true,
            ..Self::default()
        }
    }

    /// Engine that reports not ready until [`set_ready`](Self::set_ready).
    pub fn not_ready() -> Self {
        Self::default()
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Options of the latest `configure` call.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Dependencies passed to `initialize`.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// Drain recorded calls.
    pub fn take_calls(&mut self) -> Vec<EngineCall> {
        std::mem::take(&mut self.calls)
    }
}

impl RenderingEngine for RecordingEngine {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn initialize(&mut self, dependencies: &[Dependency]) {
        self.dependencies = dependencies.to_vec();
        self.calls.push(EngineCall::Initialize(dependencies.to_vec()));
    }

    fn configure(&mut self, options: &Options) {
        self.options.clone_from(options);
        self.calls.push(EngineCall::Configure(options.clone()));
    }

    fn slide(&mut self, location: Location) {
        self.calls.push(EngineCall::Slide(location));
    }

    fn sync(&mut self) {
        self.calls.push(EngineCall::Sync);
    }
}
