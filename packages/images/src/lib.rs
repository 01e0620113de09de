// ABOUTME: Image asset storage for task attachments
// ABOUTME: Upload validation, collision-free naming, and best-effort deletion

pub mod store;
pub mod upload;

pub use store::ImageStore;
pub use upload::{is_image_content_type, ImageError, ImageUpload, UploadLimits};
