//! File-backed local store.
//!
//! One file per slot under a data directory, so the token and guest cart
//! survive restarts the way browser local storage survives reloads. Values
//! are written whole; there are no partial updates.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::ports::{LocalStore, LocalStoreError};

/// Durable store keeping each slot in its own file.
#[derive(Debug, Clone)]
pub struct FileLocalStore {
    base_path: PathBuf,
}

impl FileLocalStore {
    /// Create a store rooted at the given directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        // Slot names are fixed identifiers, never user input.
        self.base_path.join(key)
    }

    async fn ensure_dir(&self) -> Result<(), LocalStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| LocalStoreError::io(e.to_string()))
    }
}

#[async_trait]
impl LocalStore for FileLocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LocalStoreError::io(e.to_string())),
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        self.ensure_dir().await?;
        fs::write(self.slot_path(key), value)
            .await
            .map_err(|e| LocalStoreError::io(e.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), LocalStoreError> {
        match fs::remove_file(self.slot_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LocalStoreError::io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn get_of_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileLocalStore::new(dir.path());

        assert_eq!(store.get("auth_token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_then_get_roundtrips() {
        let dir = TempDir::new().unwrap();
        let store = FileLocalStore::new(dir.path());

        store.put("auth_token", "abc.def.ghi").await.unwrap();
        assert_eq!(
            store.get("auth_token").await.unwrap().as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[tokio::test]
    async fn values_survive_a_new_store_instance() {
        let dir = TempDir::new().unwrap();

        let store = FileLocalStore::new(dir.path());
        store.put("guest_cart", r#"{"userId":0}"#).await.unwrap();
        drop(store);

        let reopened = FileLocalStore::new(dir.path());
        assert_eq!(
            reopened.get("guest_cart").await.unwrap().as_deref(),
            Some(r#"{"userId":0}"#)
        );
    }

    #[tokio::test]
    async fn put_overwrites_the_whole_value() {
        let dir = TempDir::new().unwrap();
        let store = FileLocalStore::new(dir.path());

        store.put("slot", "first-and-longer").await.unwrap();
        store.put("slot", "second").await.unwrap();
        assert_eq!(store.get("slot").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileLocalStore::new(dir.path());

        store.put("slot", "value").await.unwrap();
        store.remove("slot").await.unwrap();
        store.remove("slot").await.unwrap();
        assert_eq!(store.get("slot").await.unwrap(), None);
    }

    #[tokio::test]
    async fn works_before_the_directory_exists() {
        let dir = TempDir::new().unwrap();
        let store = FileLocalStore::new(dir.path().join("nested/never-created"));

        assert_eq!(store.get("slot").await.unwrap(), None);
        store.remove("slot").await.unwrap();
        store.put("slot", "value").await.unwrap();
        assert_eq!(store.get("slot").await.unwrap().as_deref(), Some("value"));
    }
}
