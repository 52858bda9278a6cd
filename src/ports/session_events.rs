//! Session-change notification port.
//!
//! Independently-mounted UI pieces (navbar, cart page) learn about login and
//! logout through this channel rather than through any ambient global
//! dispatch, so delivery order is explicit and testable.

use std::sync::Arc;

/// Payload broadcast on every session transition.
///
/// `token` carries the new credential after a login, or `None` after a
/// logout, expiry, or decode-failure cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionChanged {
    pub token: Option<String>,
}

impl SessionChanged {
    pub fn signed_in(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn signed_out() -> Self {
        Self { token: None }
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }
}

/// Reacts to a session transition.
pub trait SessionChangedHandler: Send + Sync {
    fn on_session_changed(&self, event: &SessionChanged);

    /// Identifies the handler in logs.
    fn name(&self) -> &'static str;
}

/// Process-wide session-change channel.
///
/// # Contract
///
/// Handlers are invoked synchronously, in subscription order, on the task
/// that publishes. Handlers must not block; anything slow belongs on a
/// spawned task inside the handler.
pub trait SessionEventBus: Send + Sync {
    fn publish(&self, event: SessionChanged);

    fn subscribe(&self, handler: Arc<dyn SessionChangedHandler>);
}
