//! Theme event bus
//!
//! Events are broadcast to every subscriber with tokio's broadcast channel.
//! A subscriber only sees events published after it subscribed.

use tokio::sync::broadcast;

/// Channel capacity for theme events
const CHANNEL_CAPACITY: usize = 64;

/// Events the theme subsystem reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeEvent {
    /// The selected theme changed
    SelectTheme(Option<String>),
    /// A theme should be (re)applied, e.g. after its variables were saved
    ApplyTheme(Option<String>),
    /// The application finished starting up
    Startup,
}

impl ThemeEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ThemeEvent::SelectTheme(_) => "select-theme",
            ThemeEvent::ApplyTheme(_) => "apply-theme",
            ThemeEvent::Startup => "startup",
        }
    }
}

/// Broadcast bus for [`ThemeEvent`]s; clones share the same channel
#[derive(Clone, Debug)]
pub struct ThemeEventBus {
    sender: broadcast::Sender<ThemeEvent>,
}

impl ThemeEventBus {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers
    pub fn publish(&self, event: ThemeEvent) {
        tracing::debug!(event = event.name(), ?event, "Publishing theme event");
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ThemeEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ThemeEventBus {
    fn default() -> Self {
        Self::new()
    }
}
