//! Theme registry across the bundled and user theme roots
//!
//! Themes are directories in:
//! 1. Bundled themes: shipped next to the application
//! 2. User themes: `<data_dir>/themeswitch/themes`, shadowing bundled themes
//!    with the same name
//!
//! Nothing is cached; every listing rescans both roots.

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    error::Result,
    types::{ThemeDirectory, ThemeOrigin},
};

/// Registry over a bundled and a user theme root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeRegistry {
    bundled_root: PathBuf,
    user_root: PathBuf,
}

impl ThemeRegistry {
    pub fn new(bundled_root: impl Into<PathBuf>, user_root: impl Into<PathBuf>) -> Self {
        Self {
            bundled_root: bundled_root.into(),
            user_root: user_root.into(),
        }
    }

    pub fn bundled_root(&self) -> &Path {
        &self.bundled_root
    }

    pub fn user_root(&self) -> &Path {
        &self.user_root
    }

    /// List every theme directory, user themes overriding bundled ones
    pub async fn list_themes(&self) -> Result<Vec<ThemeDirectory>> {
        let themes = read_extensible_dir(&self.bundled_root, &self.user_root).await;
        debug!(
            count = themes.len(),
            themes = ?themes.iter().map(ThemeDirectory::name).collect::<Vec<_>>(),
            "Listed themes"
        );
        Ok(themes)
    }

    /// Rescan the roots and resolve a single theme
    pub async fn lookup(&self, name: &str) -> Result<Option<ThemeDirectory>> {
        let themes = self.list_themes().await?;
        Ok(resolve(name, &themes).cloned())
    }
}

/// Find the authoritative directory for `name`.
///
/// The list is expected in precedence order; the first basename match wins.
/// `None` is the not-found signal.
pub fn resolve<'a>(name: &str, themes: &'a [ThemeDirectory]) -> Option<&'a ThemeDirectory> {
    themes.iter().find(|theme| theme.name() == name)
}

/// Merge the subdirectories of both roots.
///
/// A user directory replaces the bundled directory with the same basename in
/// place; user-only themes are appended. A missing or unreadable root
/// contributes nothing.
pub async fn read_extensible_dir(bundled: &Path, user: &Path) -> Vec<ThemeDirectory> {
    let mut merged = list_subdirectories(bundled, ThemeOrigin::Bundled).await;

    for theme in list_subdirectories(user, ThemeOrigin::User).await {
        match merged.iter_mut().find(|existing| existing.name() == theme.name()) {
            Some(existing) => *existing = theme,
            None => merged.push(theme),
        }
    }

    merged
}

/// Subdirectories of `root`, following symlinks. Read failures are logged
/// and end the scan of that root with whatever was collected so far.
async fn list_subdirectories(root: &Path, origin: ThemeOrigin) -> Vec<ThemeDirectory> {
    let mut entries = match tokio::fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(root = %root.display(), "Theme root does not exist");
            return Vec::new();
        }
        Err(e) => {
            warn!(root = %root.display(), error = %e, "Theme root is not readable, skipping");
            return Vec::new();
        }
    };

    let mut themes = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "Failed to read theme root entry");
                break;
            }
        };

        let path = entry.path();
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => continue,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Skipping unreadable theme entry");
                continue;
            }
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        themes.push(ThemeDirectory::new(name, path, origin));
    }

    themes.sort_by(|a, b| a.name().cmp(b.name()));
    themes
}
