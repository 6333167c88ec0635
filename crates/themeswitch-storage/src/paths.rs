//! Application directory layout
//!
//! User themes and the persisted state live under the platform data
//! directory, e.g. `~/.local/share/themeswitch` on Linux.

use std::path::{Path, PathBuf};

use crate::error::{StorageError, StorageResult};

const APPLICATION: &str = "themeswitch";

/// Resolved application directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    user_data: PathBuf,
}

impl AppPaths {
    /// Resolve the platform user-data directory for the application
    pub fn resolve() -> StorageResult<Self> {
        let base = dirs::data_dir().ok_or_else(|| StorageError::PathResolutionError {
            message: "could not determine the user data directory".to_string(),
        })?;
        Ok(Self::with_user_data(base.join(APPLICATION)))
    }

    /// Use an explicit user-data directory
    pub fn with_user_data(user_data: impl Into<PathBuf>) -> Self {
        Self {
            user_data: user_data.into(),
        }
    }

    /// Root of the application's user data
    pub fn user_data(&self) -> &Path {
        &self.user_data
    }

    /// Directory holding user-provided and customized themes
    pub fn themes_dir(&self) -> PathBuf {
        self.user_data.join("themes")
    }

    /// File holding the persisted settings state
    pub fn state_file(&self) -> PathBuf {
        self.user_data.join("state.json")
    }
}
