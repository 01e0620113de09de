// ABOUTME: In-memory document storage
// ABOUTME: Used by tests and ephemeral runs; same contract as the file backend

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{DocumentBackend, StorageResult, EMPTY_DOCUMENT};

#[derive(Debug)]
pub struct MemoryBackend {
    document: RwLock<Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            document: RwLock::new(EMPTY_DOCUMENT.to_vec()),
        }
    }

    /// Start from an existing document
    pub fn with_document(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            document: RwLock::new(bytes.into()),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn read(&self) -> StorageResult<Vec<u8>> {
        Ok(self.document.read().await.clone())
    }

    async fn write(&self, bytes: &[u8]) -> StorageResult<()> {
        *self.document.write().await = bytes.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
