//! Page-changed notification bus.
//!
//! The router emits one [`PageChanged`] event per completed content swap.
//! Feature modules subscribe to reinitialize against the newly injected
//! DOM. Built on a tokio broadcast channel; emitting with no subscribers
//! is fine.

use tokio::sync::broadcast;

/// Notification that the visible page content was swapped.
#[derive(Debug, Clone)]
pub struct PageChanged {
    /// The href as it was requested (not the resolved URL).
    pub href: String,
}

/// Broadcast bus for page-changed notifications.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PageChanged>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Subscribe to page-changed notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<PageChanged> {
        self.tx.subscribe()
    }

    /// Emit a page-changed notification. Lagging or absent receivers are
    /// not an error.
    pub fn emit(&self, href: impl Into<String>) {
        let _ = self.tx.send(PageChanged { href: href.into() });
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
