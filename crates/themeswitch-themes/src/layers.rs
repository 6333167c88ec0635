//! Theme directory to stylesheet layer mapping

use std::path::Path;

use crate::types::{LayerPaths, StylesheetLayer};

/// Map a theme directory to the extensionless stem of every layer.
///
/// No I/O happens here. Picking `.scss` or `.css` and skipping layers the
/// theme does not supply is the renderer's job.
pub fn map_layers(theme_dir: &Path) -> LayerPaths {
    LayerPaths {
        variables: theme_dir.join(StylesheetLayer::Variables.as_str()),
        details: theme_dir.join(StylesheetLayer::Details.as_str()),
        fonts: theme_dir.join(StylesheetLayer::Fonts.as_str()),
        style: theme_dir.join(StylesheetLayer::Style.as_str()),
    }
}
