//! Event-driven theme application
//!
//! Selection and apply-request events re-apply immediately. The startup
//! event re-applies the stored selection after a short delay, covering a
//! renderer that initialized after the synchronous startup apply ran.

use std::{sync::Arc, time::Duration};

use themeswitch_storage::SettingsStore;
use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};
use tracing::{debug, error, warn};

use crate::{
    applier::{ApplyOutcome, ThemeApplier},
    events::{ThemeEvent, ThemeEventBus},
};

/// Default delay before the startup re-apply
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_millis(250);

/// Applies themes in response to [`ThemeEvent`]s
#[derive(Debug, Clone)]
pub struct ApplicationWatchdog {
    applier: Arc<ThemeApplier>,
    store: SettingsStore,
    startup_delay: Duration,
}

impl ApplicationWatchdog {
    pub fn new(applier: Arc<ThemeApplier>, store: SettingsStore) -> Self {
        Self {
            applier,
            store,
            startup_delay: DEFAULT_STARTUP_DELAY,
        }
    }

    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }

    /// Subscribe to `bus` and handle events until the bus closes or the
    /// returned handle is dropped. Must be called inside a tokio runtime.
    pub fn spawn(self, bus: &ThemeEventBus) -> WatchdogHandle {
        let mut events = bus.subscribe();
        let task = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        self.handle_event(event);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Theme watchdog lagged behind, events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("Theme event bus closed, watchdog stopping");
        });
        WatchdogHandle { task }
    }

    /// React to one event. The apply runs on its own task and is not awaited.
    pub fn handle_event(&self, event: ThemeEvent) -> Option<JoinHandle<()>> {
        debug!(event = event.name(), ?event, "Theme event received");
        match event {
            ThemeEvent::SelectTheme(theme) | ThemeEvent::ApplyTheme(theme) => {
                let applier = Arc::clone(&self.applier);
                Some(tokio::spawn(async move { apply_logged(&applier, theme).await }))
            }
            ThemeEvent::Startup => {
                if self.store.current_theme().is_none() {
                    debug!("No theme selected, skipping startup re-apply");
                    return None;
                }
                Some(self.spawn_startup_apply())
            }
        }
    }

    /// The selection is read after the delay so a change made meanwhile wins.
    fn spawn_startup_apply(&self) -> JoinHandle<()> {
        let applier = Arc::clone(&self.applier);
        let store = self.store.clone();
        let delay = self.startup_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(theme) = store.current_theme() else {
                debug!("Theme selection cleared during startup delay, skipping re-apply");
                return;
            };
            debug!(theme = %theme, "Re-applying theme after startup delay");
            apply_logged(&applier, Some(theme)).await;
        })
    }
}

async fn apply_logged(applier: &ThemeApplier, theme: Option<String>) {
    match applier.apply(theme.as_deref(), false).await {
        Ok(ApplyOutcome::Applied { .. } | ApplyOutcome::Cleared) => {}
        Ok(outcome) => debug!(?outcome, "Theme apply did not complete"),
        Err(e) => error!(theme = ?theme, error = %e, "Failed to apply theme"),
    }
}

/// Running watchdog task; aborted on drop
#[derive(Debug)]
pub struct WatchdogHandle {
    task: JoinHandle<()>,
}

impl WatchdogHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn abort(&self) {
        self.task.abort();
    }
}

impl Drop for WatchdogHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
