//! Renderer sink contract
//!
//! The renderer turns extensionless layer stems into injected CSS. It owns
//! extension resolution and treats a stem with no file behind it as an empty
//! layer.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use parking_lot::Mutex;

use crate::types::StylesheetLayer;

/// Extensions tried, in order, when resolving a layer stem
pub const STYLESHEET_EXTENSIONS: [&str; 2] = ["scss", "css"];

/// Sink receiving stylesheet layer changes
pub trait StylesheetRenderer: Send + Sync {
    /// Set a layer to a path stem, or mark it absent with `None`
    fn set_layer(&self, layer: StylesheetLayer, stem: Option<&Path>);

    /// Drop every layer currently set
    fn clear_all_layers(&self);

    /// Content of the live style-injection target, if any
    fn injected_content(&self) -> Option<String>;
}

/// A single call received by a [`MemoryRenderer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererCall {
    SetLayer(StylesheetLayer, Option<PathBuf>),
    ClearAll,
}

#[derive(Debug, Default)]
struct MemoryRendererState {
    layers: BTreeMap<StylesheetLayer, Option<PathBuf>>,
    calls: Vec<RendererCall>,
}

/// In-memory renderer that keeps the layer table and a call log.
///
/// Injected content is read from disk on demand, using the first existing
/// file among [`STYLESHEET_EXTENSIONS`] for every set layer.
#[derive(Debug, Default)]
pub struct MemoryRenderer {
    state: Mutex<MemoryRendererState>,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the layer table. Layers never set are missing; layers
    /// set absent map to `None`.
    pub fn layers(&self) -> BTreeMap<StylesheetLayer, Option<PathBuf>> {
        self.state.lock().layers.clone()
    }

    /// Stem currently set for a layer
    pub fn layer(&self, layer: StylesheetLayer) -> Option<PathBuf> {
        self.state.lock().layers.get(&layer).cloned().flatten()
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<RendererCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }
}

/// Resolve a layer stem to an existing stylesheet file
pub fn resolve_stylesheet(stem: &Path) -> Option<PathBuf> {
    STYLESHEET_EXTENSIONS
        .iter()
        .map(|ext| stem.with_extension(ext))
        .find(|candidate| candidate.is_file())
}

impl StylesheetRenderer for MemoryRenderer {
    fn set_layer(&self, layer: StylesheetLayer, stem: Option<&Path>) {
        let mut state = self.state.lock();
        let stem = stem.map(Path::to_path_buf);
        state.calls.push(RendererCall::SetLayer(layer, stem.clone()));
        state.layers.insert(layer, stem);
    }

    fn clear_all_layers(&self) {
        let mut state = self.state.lock();
        state.calls.push(RendererCall::ClearAll);
        state.layers.clear();
    }

    fn injected_content(&self) -> Option<String> {
        let stems: Vec<PathBuf> = self.state.lock().layers.values().flatten().cloned().collect();

        let content: String = stems
            .iter()
            .filter_map(|stem| resolve_stylesheet(stem))
            .filter_map(|file| fs::read_to_string(file).ok())
            .collect();

        (!content.is_empty()).then_some(content)
    }
}
