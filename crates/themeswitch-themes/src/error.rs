//! Error types for the themes crate

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Theme not found: {0}")]
    NotFound(String),

    #[error("Theme already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid theme name: {0:?}")]
    InvalidName(String),

    #[error("No application registered to open {}", path.display())]
    MissingHandler { path: PathBuf },

    #[error("Font scanner unavailable: {0}")]
    FontScanner(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] themeswitch_storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ThemeError>;
