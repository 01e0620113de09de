// ABOUTME: Multipart form decoding for task create and update requests
// ABOUTME: Collects text fields and image parts, then converts them into store inputs

use axum::extract::multipart::{Field, Multipart, MultipartError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

use taskbook_core::split_tags;
use taskbook_images::{ImageError, ImageUpload, UploadLimits};
use taskbook_tasks::{FontWeight, TaskCreateInput, TaskPriority, TaskUpdateInput};

use crate::error::{ApiError, ApiResult};

/// Raw fields of a task form. `None` means the field was not sent.
#[derive(Debug, Default)]
pub struct TaskForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub text_color: Option<String>,
    pub font_weight: Option<String>,
    pub due_at: Option<String>,
    pub tags: Option<String>,
    pub priority: Option<String>,
    pub remove_images: Option<String>,
    pub images: Vec<ImageUpload>,
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::bad_request(format!("Malformed form data: {}", err.body_text()))
    }
}

async fn text(field: Field<'_>) -> ApiResult<String> {
    Ok(field.text().await?)
}

impl TaskForm {
    /// Read every part. File parts beyond `limits.max_files` fail fast.
    pub async fn read(mut multipart: Multipart, limits: UploadLimits) -> ApiResult<Self> {
        let mut form = TaskForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "images" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;

                    // Browsers send an empty part when no file was picked
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    if form.images.len() >= limits.max_files {
                        return Err(ImageError::TooManyFiles {
                            max: limits.max_files,
                        }
                        .into());
                    }
                    form.images
                        .push(ImageUpload::new(file_name, content_type, bytes.to_vec()));
                }
                "title" => form.title = Some(text(field).await?),
                "content" => form.content = Some(text(field).await?),
                "textColor" => form.text_color = Some(text(field).await?),
                "fontWeight" => form.font_weight = Some(text(field).await?),
                "dueAt" => form.due_at = Some(text(field).await?),
                "tags" => form.tags = Some(text(field).await?),
                "priority" => form.priority = Some(text(field).await?),
                "removeImages" => form.remove_images = Some(text(field).await?),
                other => debug!("Ignoring form field '{}'", other),
            }
        }

        Ok(form)
    }

    /// Input for a new task. Image paths are filled in after the files are stored.
    pub fn create_input(&self) -> ApiResult<TaskCreateInput> {
        let title = self.title.clone().unwrap_or_default();
        if title.trim().is_empty() {
            return Err(ApiError::bad_request("Title required"));
        }

        Ok(TaskCreateInput {
            title,
            content: self.content.clone(),
            text_color: self.text_color.clone(),
            font_weight: parse_font_weight(self.font_weight.as_deref())?,
            images: Vec::new(),
            tags: self.tags.as_deref().map(split_tags).unwrap_or_default(),
            due_at: match self.due_at.as_deref() {
                Some(raw) => parse_due_at(raw)?,
                None => None,
            },
            priority: parse_priority(self.priority.as_deref())?,
        })
    }

    /// Partial update. Newly stored image paths are added by the caller.
    pub fn update_input(&self) -> ApiResult<TaskUpdateInput> {
        let remove_images = match self.remove_images.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => serde_json::from_str::<Vec<String>>(raw)
                .map_err(|_| ApiError::bad_request("removeImages must be a JSON array of paths"))?,
            _ => Vec::new(),
        };

        Ok(TaskUpdateInput {
            title: self.title.clone(),
            content: self.content.clone(),
            text_color: self.text_color.clone(),
            font_weight: parse_font_weight(self.font_weight.as_deref())?,
            due_at: match self.due_at.as_deref() {
                Some(raw) => Some(parse_due_at(raw)?),
                None => None,
            },
            priority: parse_priority(self.priority.as_deref())?,
            tags: self.tags.as_deref().map(split_tags),
            remove_images,
            add_images: Vec::new(),
        })
    }
}

fn parse_priority(raw: Option<&str>) -> ApiResult<Option<TaskPriority>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.parse().map(Some).map_err(ApiError::BadRequest),
        None => Ok(None),
    }
}

fn parse_font_weight(raw: Option<&str>) -> ApiResult<Option<FontWeight>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.parse().map(Some).map_err(ApiError::BadRequest),
        None => Ok(None),
    }
}

/// Parse a due date. Blank clears it.
///
/// Accepts RFC 3339, a `datetime-local` value (`2024-05-01T09:30`, read as
/// UTC), or a plain date (midnight UTC).
pub fn parse_due_at(raw: &str) -> ApiResult<Option<DateTime<Utc>>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(naive.and_utc()));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(naive.and_utc()));
        }
    }

    Err(ApiError::bad_request(format!("Invalid dueAt: {}", raw)))
}
