//! Durable client-side key-value store port.
//!
//! Holds the few slots that must survive a restart: the auth token, its
//! type, and the serialized guest cart. There is no schema versioning -
//! values are opaque strings to the store.

use async_trait::async_trait;
use thiserror::Error;

/// Fixed slot names in the durable store.
pub mod keys {
    /// Bearer credential.
    pub const AUTH_TOKEN: &str = "auth_token";

    /// Token type reported at login (usually "Bearer").
    pub const AUTH_TOKEN_TYPE: &str = "auth_token_type";

    /// Serialized guest-cart JSON blob.
    pub const GUEST_CART: &str = "guest_cart";
}

/// Errors from the durable store.
#[derive(Debug, Clone, Error)]
pub enum LocalStoreError {
    #[error("IO error: {0}")]
    Io(String),
}

impl LocalStoreError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }
}

/// A durable string-keyed store.
///
/// # Contract
///
/// - `get` of a never-written or removed key returns `Ok(None)`.
/// - `put` overwrites the whole value; there are no partial writes.
/// - `remove` is idempotent.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

    async fn put(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;

    async fn remove(&self, key: &str) -> Result<(), LocalStoreError>;
}
