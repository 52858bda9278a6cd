//! In-memory local store for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::ports::{LocalStore, LocalStoreError};

/// HashMap-backed store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryLocalStore {
    slots: RwLock<HashMap<String, String>>,
}

impl InMemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a slot, for arranging test state.
    pub fn with_slot(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots
            .write()
            .expect("InMemoryLocalStore: lock poisoned")
            .insert(key.into(), value.into());
        self
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .expect("InMemoryLocalStore: lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LocalStore for InMemoryLocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        Ok(self
            .slots
            .read()
            .expect("InMemoryLocalStore: lock poisoned")
            .get(key)
            .cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        self.slots
            .write()
            .expect("InMemoryLocalStore: lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
        self.slots
            .write()
            .expect("InMemoryLocalStore: lock poisoned")
            .remove(key);
        Ok(())
    }
}
