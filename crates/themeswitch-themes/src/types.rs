//! Core theme types

use std::{
    fmt,
    path::{Path, PathBuf},
};

/// One of the four stylesheet layers a theme can supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StylesheetLayer {
    Variables,
    Details,
    Fonts,
    Style,
}

impl StylesheetLayer {
    /// Every layer, in the order they are pushed to the renderer
    pub const ALL: [StylesheetLayer; 4] = [
        StylesheetLayer::Variables,
        StylesheetLayer::Details,
        StylesheetLayer::Fonts,
        StylesheetLayer::Style,
    ];

    /// Layer key, also the file stem inside a theme directory
    pub fn as_str(&self) -> &'static str {
        match self {
            StylesheetLayer::Variables => "variables",
            StylesheetLayer::Details => "details",
            StylesheetLayer::Fonts => "fonts",
            StylesheetLayer::Style => "style",
        }
    }
}

impl fmt::Display for StylesheetLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extensionless stylesheet paths for every layer of a theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerPaths {
    pub variables: PathBuf,
    pub details: PathBuf,
    pub fonts: PathBuf,
    pub style: PathBuf,
}

impl LayerPaths {
    /// Path stem for a single layer
    pub fn get(&self, layer: StylesheetLayer) -> &Path {
        match layer {
            StylesheetLayer::Variables => &self.variables,
            StylesheetLayer::Details => &self.details,
            StylesheetLayer::Fonts => &self.fonts,
            StylesheetLayer::Style => &self.style,
        }
    }

    /// Iterate layers in renderer order
    pub fn iter(&self) -> impl Iterator<Item = (StylesheetLayer, &Path)> + '_ {
        StylesheetLayer::ALL
            .into_iter()
            .map(move |layer| (layer, self.get(layer)))
    }
}

/// Which search root a theme directory came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeOrigin {
    Bundled,
    User,
}

/// A directory supplying a theme's stylesheets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeDirectory {
    name: String,
    path: PathBuf,
    origin: ThemeOrigin,
}

impl ThemeDirectory {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, origin: ThemeOrigin) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            origin,
        }
    }

    /// Basename of the directory, which is the theme identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> ThemeOrigin {
        self.origin
    }

    /// Whether the directory lives under the user override root
    pub fn is_custom(&self) -> bool {
        self.origin == ThemeOrigin::User
    }
}
