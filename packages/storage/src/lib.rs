// ABOUTME: Persistence layer for Taskbook
// ABOUTME: Storage errors, injectable document backends, and typed JSON collections

use async_trait::async_trait;
use thiserror::Error;

pub mod collection;
pub mod file;
pub mod memory;

pub use collection::JsonCollection;
pub use file::JsonFileBackend;
pub use memory::MemoryBackend;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl StorageError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for errors caused by the caller's input rather than the backend
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StorageError::Validation(_) | StorageError::InvalidFormat(_)
        )
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Byte-level persistence for one JSON document.
///
/// A backend only knows how to read and atomically replace a whole document;
/// typed access goes through [`JsonCollection`].
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Create whatever the backend needs (directories, an empty document)
    async fn initialize(&self) -> StorageResult<()>;

    /// Read the full document
    async fn read(&self) -> StorageResult<Vec<u8>>;

    /// Replace the full document. Readers never observe a partial write.
    async fn write(&self, bytes: &[u8]) -> StorageResult<()>;

    /// Human-readable location, used in logs
    fn describe(&self) -> String;
}

/// Content written for a fresh collection
pub(crate) const EMPTY_DOCUMENT: &[u8] = b"[]";
