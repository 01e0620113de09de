// ABOUTME: Image file storage under the data directory
// ABOUTME: Writes uploads under generated names and deletes them best-effort

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use taskbook_core::IMAGES_DIR_NAME;

use crate::upload::{ImageError, ImageUpload, UploadLimits};

/// Directory of image files referenced by tasks as `images/<name>`
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    limits: UploadLimits,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            limits: UploadLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: UploadLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn limits(&self) -> UploadLimits {
        self.limits
    }

    pub async fn initialize(&self) -> Result<(), ImageError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Write one file and return its relative path (`images/<uuid><ext>`)
    pub async fn save(&self, bytes: &[u8], original_name: &str) -> Result<String, ImageError> {
        let file_name = format!(
            "{}{}",
            taskbook_core::generate_task_id(),
            extension_of(original_name)
        );
        let path = self.dir.join(&file_name);

        fs::write(&path, bytes).await?;
        debug!("Stored image {} ({} bytes)", file_name, bytes.len());

        Ok(format!("{}/{}", IMAGES_DIR_NAME, file_name))
    }

    /// Validate the whole batch, then write every file.
    /// Nothing is left on disk when any step fails.
    pub async fn save_batch(&self, uploads: &[ImageUpload]) -> Result<Vec<String>, ImageError> {
        self.limits.validate_batch(uploads)?;

        let mut saved = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match self.save(&upload.bytes, &upload.file_name).await {
                Ok(path) => saved.push(path),
                Err(e) => {
                    self.delete_all(&saved).await;
                    return Err(e);
                }
            }
        }

        Ok(saved)
    }

    /// Remove one image. Missing files and failures are logged, never returned.
    pub async fn delete(&self, relative_path: &str) {
        let Some(path) = self.resolve(relative_path) else {
            warn!("Ignoring unexpected image path: {}", relative_path);
            return;
        };

        match fs::remove_file(&path).await {
            Ok(()) => debug!("Deleted image {:?}", path),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Image already gone: {:?}", path)
            }
            Err(e) => warn!("Failed to delete image {:?}: {}", path, e),
        }
    }

    pub async fn delete_all<S: AsRef<str>>(&self, relative_paths: &[S]) {
        for path in relative_paths {
            self.delete(path.as_ref()).await;
        }
    }

    /// Map a stored relative path to a file inside the image directory.
    /// Only the final component is used, so `images/../../x` resolves to `<dir>/x`.
    pub fn resolve(&self, relative_path: &str) -> Option<PathBuf> {
        let name = Path::new(relative_path).file_name()?.to_str()?;
        if name.is_empty() || name == "." || name == ".." {
            return None;
        }
        Some(self.dir.join(name))
    }
}

/// Extension of the client's file name, dot included (`.png`), or empty.
/// Anything but ASCII alphanumerics is dropped.
fn extension_of(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}
