use std::sync::Arc;

use lesson_core::model::ProgressMap;
use tracing::warn;

use crate::repository::{LocalStore, StorageError};

/// Local store key holding the serialized progress map.
pub const PROGRESS_KEY: &str = "lesson_progress";

/// Typed access to the locally cached progress map.
#[derive(Clone)]
pub struct ProgressStore {
    store: Arc<dyn LocalStore>,
}

impl ProgressStore {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Load the cached map. A missing entry is an empty map; so is an entry
    /// that no longer parses, which is logged and left in place.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying store cannot be read.
    pub async fn get(&self) -> Result<ProgressMap, StorageError> {
        let Some(raw) = self.store.get_item(PROGRESS_KEY).await? else {
            return Ok(ProgressMap::new());
        };
        match serde_json::from_str(&raw) {
            Ok(map) => Ok(map),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable cached progress");
                Ok(ProgressMap::new())
            }
        }
    }

    /// Replace the cached map entirely.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    pub async fn set(&self, map: &ProgressMap) -> Result<(), StorageError> {
        let raw = serde_json::to_string(map)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.store.set_item(PROGRESS_KEY, &raw).await
    }

    /// Merge `incoming` into the cached map and return the result.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the read or write fails.
    pub async fn merge(&self, incoming: &ProgressMap) -> Result<ProgressMap, StorageError> {
        self.update(|map| {
            map.merge(incoming);
            map.clone()
        })
        .await
    }

    /// Read, modify and write the cached map in one step.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the read or write fails; nothing is written
    /// when the read fails.
    pub async fn update<T>(
        &self,
        apply: impl FnOnce(&mut ProgressMap) -> T + Send,
    ) -> Result<T, StorageError> {
        let mut map = self.get().await?;
        let out = apply(&mut map);
        self.set(&map).await?;
        Ok(out)
    }
}
