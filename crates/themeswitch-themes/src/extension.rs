//! Wiring of the theme subsystem
//!
//! [`ThemeExtension::init`] runs the startup sequence: the stored selection
//! is applied synchronously so it lands before the renderer's first refresh,
//! then the watchdog starts handling theme events.

use std::sync::Arc;

use themeswitch_storage::SettingsStore;
use tracing::debug;

use crate::{
    applier::{ApplyOutcome, ThemeApplier},
    config::ThemesConfig,
    editor::{edit_style, DialogSink, EditOutcome, FileOpener},
    error::Result,
    events::{ThemeEvent, ThemeEventBus},
    fonts::{available_fonts, FontSource},
    operations::ThemeOperations,
    registry::ThemeRegistry,
    renderer::StylesheetRenderer,
    watchdog::{ApplicationWatchdog, WatchdogHandle},
};

/// The assembled theme subsystem
#[derive(Debug)]
pub struct ThemeExtension {
    config: ThemesConfig,
    store: SettingsStore,
    bus: ThemeEventBus,
    applier: Arc<ThemeApplier>,
    operations: ThemeOperations,
    watchdog: Option<WatchdogHandle>,
}

impl ThemeExtension {
    pub fn new(
        config: ThemesConfig,
        store: SettingsStore,
        renderer: Arc<dyn StylesheetRenderer>,
    ) -> Self {
        let registry = ThemeRegistry::new(&config.bundled_themes_dir, &config.user_themes_dir);
        let bus = ThemeEventBus::new();
        let applier = Arc::new(
            ThemeApplier::new(renderer, registry.clone())
                .with_verification_delay(config.verification_delay()),
        );
        let operations = ThemeOperations::new(registry, store.clone(), bus.clone());

        Self {
            config,
            store,
            bus,
            applier,
            operations,
            watchdog: None,
        }
    }

    /// Apply the stored theme synchronously and start the watchdog.
    ///
    /// Returns the outcome of the synchronous apply, or `None` when no theme
    /// is selected. Must be called inside a tokio runtime; calling it again
    /// only re-applies.
    pub fn init(&mut self) -> Option<ApplyOutcome> {
        let current = self.store.current_theme();
        debug!(theme = ?current, "Initializing theme subsystem");

        let outcome = current
            .as_deref()
            .map(|theme| self.applier.apply_sync(Some(theme)));

        if self.watchdog.is_none() {
            let watchdog = ApplicationWatchdog::new(Arc::clone(&self.applier), self.store.clone())
                .with_startup_delay(self.config.startup_delay());
            self.watchdog = Some(watchdog.spawn(&self.bus));
        }

        outcome
    }

    /// Announce that the application finished starting up
    pub fn startup(&self) {
        self.bus.publish(ThemeEvent::Startup);
    }

    /// Stop reacting to theme events
    pub fn shutdown(&mut self) {
        self.watchdog = None;
    }

    pub fn select_theme(&self, name: Option<&str>) -> Result<()> {
        self.operations.select_theme(name)
    }

    /// Open a theme's style sheet in the user's editor
    pub async fn edit_style(
        &self,
        name: &str,
        opener: &dyn FileOpener,
        dialogs: &dyn DialogSink,
    ) -> EditOutcome {
        edit_style(self.operations.style_path(name), opener, dialogs).await
    }

    pub async fn available_fonts(&self, source: &dyn FontSource) -> Vec<String> {
        available_fonts(source).await
    }

    pub fn config(&self) -> &ThemesConfig {
        &self.config
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn bus(&self) -> &ThemeEventBus {
        &self.bus
    }

    pub fn applier(&self) -> &Arc<ThemeApplier> {
        &self.applier
    }

    pub fn operations(&self) -> &ThemeOperations {
        &self.operations
    }
}
