// ABOUTME: Typed view over a document backend
// ABOUTME: Decodes the whole JSON array on every load and re-encodes it on every save

use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

use crate::{DocumentBackend, StorageResult};

/// An ordered sequence of records persisted as one JSON array
pub struct JsonCollection<T> {
    backend: Arc<dyn DocumentBackend>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonCollection<T> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend,
            _marker: PhantomData,
        }
    }

    pub async fn initialize(&self) -> StorageResult<()> {
        self.backend.initialize().await
    }

    /// Decode the full collection. No caching between calls.
    pub async fn load(&self) -> StorageResult<Vec<T>> {
        let bytes = self.backend.read().await?;
        let records: Vec<T> = serde_json::from_slice(&bytes)?;
        debug!(
            "Loaded {} records from {}",
            records.len(),
            self.backend.describe()
        );
        Ok(records)
    }

    /// Encode and replace the full collection
    pub async fn save(&self, records: &[T]) -> StorageResult<()> {
        let bytes = serde_json::to_vec_pretty(records)?;
        self.backend.write(&bytes).await?;
        debug!(
            "Saved {} records to {}",
            records.len(),
            self.backend.describe()
        );
        Ok(())
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }
}
