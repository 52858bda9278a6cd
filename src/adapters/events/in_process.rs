//! In-process session event bus.
//!
//! Handlers are invoked synchronously, in subscription order, on the task
//! that publishes. A panicking or slow handler blocks the rest, which is the
//! price of deterministic ordering; handlers are expected to be cheap.

use std::sync::{Arc, RwLock};

use crate::ports::{SessionChanged, SessionChangedHandler, SessionEventBus};

/// Process-wide session-change channel.
#[derive(Default)]
pub struct InProcessSessionBus {
    handlers: RwLock<Vec<Arc<dyn SessionChangedHandler>>>,
}

impl InProcessSessionBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers
            .read()
            .expect("InProcessSessionBus: handlers lock poisoned")
            .len()
    }
}

impl SessionEventBus for InProcessSessionBus {
    fn publish(&self, event: SessionChanged) {
        // Clone the handler list so a handler that subscribes re-entrantly
        // does not deadlock against the read guard.
        let handlers: Vec<Arc<dyn SessionChangedHandler>> = self
            .handlers
            .read()
            .expect("InProcessSessionBus: handlers lock poisoned")
            .clone();

        tracing::debug!(
            signed_in = event.is_signed_in(),
            handlers = handlers.len(),
            "session changed"
        );

        for handler in handlers {
            handler.on_session_changed(&event);
        }
    }

    fn subscribe(&self, handler: Arc<dyn SessionChangedHandler>) {
        self.handlers
            .write()
            .expect("InProcessSessionBus: handlers lock poisoned")
            .push(handler);
    }
}

impl std::fmt::Debug for InProcessSessionBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InProcessSessionBus")
            .field("handlers", &self.handler_count())
            .finish()
    }
}
