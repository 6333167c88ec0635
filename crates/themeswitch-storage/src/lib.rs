//! Themeswitch Storage
//!
//! Persisted interface settings for themeswitch. The only field owned here is
//! the currently selected theme, mutated exclusively through
//! [`InterfaceAction`] dispatched on a [`SettingsStore`].

pub mod actions;
pub mod error;
pub mod paths;
pub mod state;
pub mod store;

pub use actions::{reduce, InterfaceAction};
pub use error::{StorageError, StorageResult};
pub use paths::AppPaths;
pub use state::{default_theme, AppState, InterfaceSettings, Settings, MACOS_DEFAULT_THEME, FALLBACK_DEFAULT_THEME};
pub use store::SettingsStore;
