//! Owned settings store
//!
//! A cloneable handle around the process-wide [`AppState`]. Every clone
//! shares the same state; [`SettingsStore::dispatch`] is the only way to
//! change it.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;

use crate::{
    actions::{reduce, InterfaceAction},
    error::{StorageError, StorageResult},
    state::AppState,
};

/// Settings store shared by every component that reads or selects themes
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    state: Arc<RwLock<AppState>>,
    state_file: Option<Arc<PathBuf>>,
}

impl SettingsStore {
    /// Create an in-memory store with default state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an in-memory store seeded with the given state
    pub fn with_state(state: AppState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            state_file: None,
        }
    }

    /// Open a store persisted at `path`.
    ///
    /// A missing file yields the default state; it is written on the first
    /// dispatch.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let state = Self::load(&path)?;
        tracing::debug!(path = %path.display(), theme = ?state.current_theme(), "Opened settings store");
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            state_file: Some(Arc::new(path)),
        })
    }

    fn load(path: &Path) -> StorageResult<AppState> {
        if !path.exists() {
            return Ok(AppState::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            StorageError::parse_error(path, "json", format!("Failed to parse settings state: {}", e))
        })
    }

    /// Snapshot of the current state
    pub fn state(&self) -> AppState {
        self.state.read().clone()
    }

    /// Currently selected theme
    pub fn current_theme(&self) -> Option<String> {
        self.state.read().settings.interface.current_theme.clone()
    }

    /// Path of the backing state file, if persisted
    pub fn state_file(&self) -> Option<&Path> {
        self.state_file.as_deref().map(PathBuf::as_path)
    }

    /// Apply an action and persist the result.
    ///
    /// The in-memory state is updated even when persisting fails.
    pub fn dispatch(&self, action: InterfaceAction) -> StorageResult<()> {
        let snapshot = {
            let mut state = self.state.write();
            state.settings.interface = reduce(&state.settings.interface, &action);
            state.clone()
        };
        tracing::debug!(?action, "Dispatched interface action");
        self.persist(&snapshot)
    }

    /// Write the current state to the backing file
    pub fn save(&self) -> StorageResult<()> {
        let snapshot = self.state();
        self.persist(&snapshot)
    }

    fn persist(&self, state: &AppState) -> StorageResult<()> {
        let Some(path) = self.state_file() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(state).map_err(|e| {
            StorageError::parse_error(path, "json", format!("Serialization failed: {}", e))
        })?;
        fs::write(path, content)?;
        Ok(())
    }
}
