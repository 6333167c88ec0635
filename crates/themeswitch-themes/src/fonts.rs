//! Font families offered by the theme settings

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Result, ThemeError};

/// Families always offered, ahead of anything found on the system
pub const DEFAULT_FONTS: [&str; 10] = [
    "Inter",
    "Roboto",
    "Montserrat",
    "BebasNeue",
    "Arial",
    "Helvetica",
    "Times New Roman",
    "Courier New",
    "Verdana",
    "Georgia",
];

/// Source of installed font families
#[async_trait]
pub trait FontSource: Send + Sync {
    async fn families(&self) -> Result<Vec<String>>;
}

/// Lists installed fonts with fontconfig's `fc-list`
#[derive(Debug, Default, Clone, Copy)]
pub struct FcListFonts;

#[async_trait]
impl FontSource for FcListFonts {
    async fn families(&self) -> Result<Vec<String>> {
        let program =
            which::which("fc-list").map_err(|e| ThemeError::FontScanner(e.to_string()))?;
        let output = Command::new(program).args([":", "family"]).output().await?;
        if !output.status.success() {
            return Err(ThemeError::FontScanner(format!(
                "fc-list exited with {}",
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(|line| line.split(',').next())
            .map(str::trim)
            .filter(|family| !family.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Default fonts followed by the scanned families in sorted order, without
/// duplicates. A failing scanner yields only the defaults.
pub async fn available_fonts(source: &dyn FontSource) -> Vec<String> {
    let mut scanned = match source.families().await {
        Ok(families) => families,
        Err(e) => {
            tracing::warn!(error = %e, "Font scanner not available, using default fonts");
            Vec::new()
        }
    };
    scanned.sort();

    let mut fonts: Vec<String> = Vec::with_capacity(DEFAULT_FONTS.len() + scanned.len());
    for family in DEFAULT_FONTS.iter().map(|f| f.to_string()).chain(scanned) {
        if !fonts.contains(&family) {
            fonts.push(family);
        }
    }
    fonts
}
