// Command handlers for the themeswitch CLI

pub mod apply;
pub mod edit;
pub mod fonts;
pub mod list;
pub mod manage;
pub mod show;

pub use apply::{ApplyCommand, SelectCommand};
pub use edit::EditCommand;
pub use fonts::FontsCommand;
pub use list::ListCommand;
pub use manage::{CloneCommand, RemoveCommand, VarsCommand};
pub use show::ShowCommand;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use themeswitch_storage::SettingsStore;
use themeswitch_themes::{MemoryRenderer, ThemeExtension, ThemeOperations, ThemesConfig};

use crate::output::OutputStyle;

/// State shared by the commands of one invocation
pub struct Context {
    pub extension: ThemeExtension,
    pub renderer: Arc<MemoryRenderer>,
    pub style: OutputStyle,
}

impl Context {
    /// Open the persisted settings and assemble the theme subsystem around
    /// an in-memory renderer
    pub fn new(config: ThemesConfig, style: OutputStyle) -> Result<Self> {
        let store = SettingsStore::open(config.state_file.clone()).with_context(|| {
            format!("failed to read settings from {}", config.state_file.display())
        })?;
        let renderer = Arc::new(MemoryRenderer::new());
        let extension = ThemeExtension::new(config, store, renderer.clone());

        Ok(Self {
            extension,
            renderer,
            style,
        })
    }

    pub fn operations(&self) -> &ThemeOperations {
        self.extension.operations()
    }

    pub fn print_layers(&self) {
        print!("{}", self.style.layer_table(&self.renderer.layers()));
    }
}

/// Trait for command handlers
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    async fn execute(&self, ctx: &Context) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::{
        fs, io,
        path::PathBuf,
        sync::{Arc, Mutex},
    };
    use tempfile::TempDir;
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output for assertions
    #[derive(Clone, Default)]
    pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl LogCapture {
        pub fn install(&self, level: tracing::Level) -> tracing::subscriber::DefaultGuard {
            let subscriber = tracing_subscriber::fmt()
                .with_writer(self.clone())
                .with_ansi(false)
                .with_max_level(level)
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        pub fn contents(&self) -> String {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    impl io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogCapture {
        type Writer = LogCapture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    pub fn config(temp: &TempDir) -> ThemesConfig {
        ThemesConfig {
            bundled_themes_dir: temp.path().join("bundled"),
            user_themes_dir: temp.path().join("user"),
            state_file: temp.path().join("state.json"),
            verification_delay_ms: 20,
            startup_delay_ms: 10,
        }
    }

    pub fn context(temp: &TempDir) -> Context {
        Context::new(config(temp), OutputStyle::plain()).unwrap()
    }

    pub fn bundled_theme(temp: &TempDir, name: &str) -> PathBuf {
        let dir = temp.path().join("bundled").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("style.css"), "body { color: black; }").unwrap();
        fs::write(dir.join("variables.scss"), "$brand-primary: #000;\n").unwrap();
        dir
    }

    /// Selection as persisted on disk
    pub fn persisted_theme(temp: &TempDir) -> Option<String> {
        SettingsStore::open(temp.path().join("state.json"))
            .unwrap()
            .current_theme()
    }
}
