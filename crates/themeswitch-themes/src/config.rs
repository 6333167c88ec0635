//! Theme subsystem configuration
//!
//! Loaded from an optional TOML file, then `THEMESWITCH_*` environment
//! variables, e.g. `THEMESWITCH_USER_THEMES_DIR=/tmp/themes`.

use std::{path::PathBuf, time::Duration};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use themeswitch_storage::AppPaths;

use crate::{
    applier::DEFAULT_VERIFICATION_DELAY,
    error::{Result, ThemeError},
    watchdog::DEFAULT_STARTUP_DELAY,
};

const ENV_PREFIX: &str = "THEMESWITCH";

/// Configuration for theme resolution and application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemesConfig {
    /// Root of the themes shipped with the application
    pub bundled_themes_dir: PathBuf,
    /// Root of user themes, which shadow bundled themes of the same name
    pub user_themes_dir: PathBuf,
    /// Persisted settings state
    pub state_file: PathBuf,
    /// Delay before checking that stylesheets were injected
    pub verification_delay_ms: u64,
    /// Delay before re-applying the selection on startup
    pub startup_delay_ms: u64,
}

impl Default for ThemesConfig {
    fn default() -> Self {
        let paths = AppPaths::resolve()
            .unwrap_or_else(|_| AppPaths::with_user_data(PathBuf::from(".themeswitch")));

        Self {
            bundled_themes_dir: default_bundled_dir(),
            user_themes_dir: paths.themes_dir(),
            state_file: paths.state_file(),
            verification_delay_ms: DEFAULT_VERIFICATION_DELAY.as_millis() as u64,
            startup_delay_ms: DEFAULT_STARTUP_DELAY.as_millis() as u64,
        }
    }
}

/// `themes/` next to the running executable, or `./themes`
fn default_bundled_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("themes")))
        .unwrap_or_else(|| PathBuf::from("themes"))
}

impl ThemesConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("themeswitch")
            .join("config.toml")
    }

    /// Load from the default location and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load from `path` (optional) and the environment
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = Config::builder()
            .add_source(File::from(path.clone()).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let loaded: ThemesConfig = config.try_deserialize()?;
        loaded.validate()?;
        tracing::debug!(path = %path.display(), config = ?loaded, "Loaded themes configuration");
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<()> {
        if self.verification_delay_ms == 0 {
            return Err(ThemeError::Validation(
                "verification_delay_ms must be greater than 0".to_string(),
            ));
        }
        if self.startup_delay_ms >= self.verification_delay_ms {
            return Err(ThemeError::Validation(
                "startup_delay_ms must be shorter than verification_delay_ms".to_string(),
            ));
        }
        Ok(())
    }

    pub fn verification_delay(&self) -> Duration {
        Duration::from_millis(self.verification_delay_ms)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = ThemesConfig::default();
        config.validate().unwrap();
        assert_eq!(config.verification_delay(), Duration::from_millis(500));
        assert!(config.user_themes_dir.ends_with("themes"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ThemesConfig::load_from(temp.path().join("absent.toml")).unwrap();
        assert_eq!(config.startup_delay_ms, 250);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
bundled_themes_dir = "/opt/app/themes"
user_themes_dir = "/home/me/themes"
verification_delay_ms = 800
"#,
        )
        .unwrap();

        let config = ThemesConfig::load_from(&path).unwrap();
        assert_eq!(config.bundled_themes_dir, PathBuf::from("/opt/app/themes"));
        assert_eq!(config.user_themes_dir, PathBuf::from("/home/me/themes"));
        assert_eq!(config.verification_delay_ms, 800);
        assert_eq!(config.startup_delay_ms, 250);
    }

    #[test]
    fn test_startup_delay_must_be_shorter() {
        let config = ThemesConfig {
            startup_delay_ms: 500,
            ..ThemesConfig::default()
        };
        assert!(matches!(config.validate(), Err(ThemeError::Validation(_))));
    }
}
