// ABOUTME: File-backed document storage
// ABOUTME: Whole-file JSON documents replaced via write-temp-then-rename

use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::{DocumentBackend, StorageResult, EMPTY_DOCUMENT};

/// A JSON document stored in a single file
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path the next document is staged at (`tasks.json.tmp`)
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("document"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl DocumentBackend for JsonFileBackend {
    async fn initialize(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        if fs::metadata(&self.path).await.is_err() {
            debug!("Creating empty document: {:?}", self.path);
            fs::write(&self.path, EMPTY_DOCUMENT).await?;
        }

        Ok(())
    }

    async fn read(&self) -> StorageResult<Vec<u8>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Document {:?} missing, treating as empty", self.path);
                Ok(EMPTY_DOCUMENT.to_vec())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, bytes: &[u8]) -> StorageResult<()> {
        let temp_path = self.temp_path();

        fs::write(&temp_path, bytes).await?;

        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                warn!("Failed to remove staged file {:?}: {}", temp_path, cleanup);
            }
            return Err(e.into());
        }

        debug!("Wrote {} bytes to {:?}", bytes.len(), self.path);
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
