//! Settings-surface theme operations
//!
//! Listing, cloning, saving and removing themes. Writes always target the
//! user theme root; bundled themes are read-only.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use once_cell::sync::Lazy;
use regex::Regex;
use themeswitch_storage::{default_theme, InterfaceAction, SettingsStore};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{
    error::{Result, ThemeError},
    events::{ThemeEvent, ThemeEventBus},
    registry::ThemeRegistry,
    types::{StylesheetLayer, ThemeDirectory},
};

/// File holding a theme's editable variables
pub const VARIABLES_FILE: &str = "variables.scss";

/// File opened when editing a theme's style
pub const STYLE_FILE: &str = "style.scss";

static VARIABLE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\$([A-Za-z0-9_-]+)\s*:\s*(.*?)\s*;").expect("variable pattern is valid")
});

/// Operations exposed to the theme settings page
#[derive(Debug, Clone)]
pub struct ThemeOperations {
    registry: ThemeRegistry,
    store: SettingsStore,
    bus: ThemeEventBus,
}

impl ThemeOperations {
    pub fn new(registry: ThemeRegistry, store: SettingsStore, bus: ThemeEventBus) -> Self {
        Self {
            registry,
            store,
            bus,
        }
    }

    /// Names of every available theme
    pub async fn read_themes(&self) -> Result<Vec<String>> {
        let themes = self.registry.list_themes().await?;
        Ok(themes.iter().map(|theme| theme.name().to_string()).collect())
    }

    /// Theme name for a theme directory
    pub fn theme_name(location: &Path) -> String {
        location
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Writable location of a theme
    pub fn theme_path(&self, name: &str) -> PathBuf {
        self.registry.user_root().join(name)
    }

    /// Whether the user root holds a theme with this name
    pub async fn is_theme_custom(&self, name: &str) -> bool {
        tokio::fs::metadata(self.theme_path(name))
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    /// Select a theme and announce the change
    pub fn select_theme(&self, name: Option<&str>) -> Result<()> {
        let name = name.map(str::to_string);
        self.store.dispatch(InterfaceAction::SelectTheme(name.clone()))?;
        self.bus.publish(ThemeEvent::SelectTheme(name));
        Ok(())
    }

    /// Parse `$name: value;` lines from the theme's variables file
    pub async fn read_theme_variables(&self, name: &str) -> Result<BTreeMap<String, String>> {
        let theme = self.require(name).await?;
        let path = theme.path().join(VARIABLES_FILE);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(theme = name, "Theme has no variables file");
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(parse_variables(&content))
    }

    /// Copy a theme into the user root under a new name and select it
    pub async fn clone_theme(&self, source: &str, new_name: &str) -> Result<PathBuf> {
        validate_theme_name(new_name)?;
        let source_theme = self.require(source).await?;

        let target = self.theme_path(new_name);
        if tokio::fs::try_exists(&target).await? {
            return Err(ThemeError::AlreadyExists(new_name.to_string()));
        }

        copy_tree(source_theme.path(), &target)?;
        info!(source, theme = new_name, path = %target.display(), "Cloned theme");

        self.select_theme(Some(new_name))?;
        Ok(target)
    }

    /// Write a theme's variables and re-apply it
    pub async fn save_theme(&self, name: &str, variables: &BTreeMap<String, String>) -> Result<()> {
        validate_theme_name(name)?;
        let dir = self.theme_path(name);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(VARIABLES_FILE), render_variables(variables)).await?;
        info!(theme = name, count = variables.len(), "Saved theme variables");

        self.bus.publish(ThemeEvent::ApplyTheme(Some(name.to_string())));
        Ok(())
    }

    /// Delete a user theme and fall back to the default theme
    pub async fn remove_theme(&self, name: &str) -> Result<()> {
        validate_theme_name(name)?;
        if !self.is_theme_custom(name).await {
            return Err(ThemeError::NotFound(name.to_string()));
        }

        tokio::fs::remove_dir_all(self.theme_path(name)).await?;
        info!(theme = name, "Removed theme");

        self.select_theme(Some(default_theme()))
    }

    /// Path of the style sheet opened by the editor for a theme
    pub fn style_path(&self, name: &str) -> PathBuf {
        self.theme_path(name).join(STYLE_FILE)
    }

    async fn require(&self, name: &str) -> Result<ThemeDirectory> {
        self.registry
            .lookup(name)
            .await?
            .ok_or_else(|| ThemeError::NotFound(name.to_string()))
    }
}

/// Theme names become directory names, so they must be a single path segment
pub fn validate_theme_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed != name
        || name == "."
        || name == ".."
        || name.contains(|c: char| c == '/' || c == '\\')
    {
        return Err(ThemeError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn parse_variables(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .filter_map(|line| VARIABLE_LINE.captures(line))
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

fn render_variables(variables: &BTreeMap<String, String>) -> String {
    variables
        .iter()
        .map(|(key, value)| format!("${}: {};\n", key, value))
        .collect()
}

fn copy_tree(source: &Path, target: &Path) -> Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(io::Error::from)?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let destination = target.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)?;
        } else {
            fs::copy(entry.path(), &destination)?;
        }
    }
    Ok(())
}

/// Layer files a theme directory actually supplies
pub fn supplied_layers(theme_dir: &Path) -> Vec<StylesheetLayer> {
    StylesheetLayer::ALL
        .into_iter()
        .filter(|layer| {
            crate::renderer::resolve_stylesheet(&theme_dir.join(layer.as_str())).is_some()
        })
        .collect()
}
