// ABOUTME: Upload types and validation rules
// ABOUTME: Checks count, size, and content type of a whole batch before anything is written

use taskbook_core::{MAX_IMAGES_PER_TASK, MAX_IMAGE_BYTES};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Too many images: at most {max} per request")]
    TooManyFiles { max: usize },
    #[error("Image '{name}' exceeds the {max} byte limit")]
    TooLarge { name: String, max: usize },
    #[error("Only images allowed (got '{0}')")]
    NotAnImage(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImageError {
    /// True when the upload itself was rejected, as opposed to a disk failure
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ImageError::Io(_))
    }
}

/// One file part received from a client
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_files: usize,
    pub max_file_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_files: MAX_IMAGES_PER_TASK,
            max_file_bytes: MAX_IMAGE_BYTES,
        }
    }
}

impl UploadLimits {
    /// Largest request body a full batch can need, plus room for form fields
    pub fn max_request_bytes(&self) -> usize {
        self.max_files * self.max_file_bytes + 1024 * 1024
    }

    pub fn validate_batch(&self, uploads: &[ImageUpload]) -> Result<(), ImageError> {
        if uploads.len() > self.max_files {
            return Err(ImageError::TooManyFiles {
                max: self.max_files,
            });
        }

        for upload in uploads {
            let content_type = upload.content_type.as_deref().unwrap_or("");
            if !is_image_content_type(content_type) {
                return Err(ImageError::NotAnImage(content_type.to_string()));
            }
            if upload.bytes.len() > self.max_file_bytes {
                return Err(ImageError::TooLarge {
                    name: upload.file_name.clone(),
                    max: self.max_file_bytes,
                });
            }
        }

        Ok(())
    }
}

/// Whether a declared MIME type is `image/*`
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .map(|m| m.type_() == mime::IMAGE)
        .unwrap_or(false)
}
