// ABOUTME: API error type and its HTTP mapping
// ABOUTME: Every failure is answered with a JSON `{"error": ...}` body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

use taskbook_images::ImageError;
use taskbook_storage::StorageError;
use taskbook_templates::TemplateError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(e) => storage_status(e),
            ApiError::Image(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Image(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Template(TemplateError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Template(TemplateError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Template(TemplateError::Storage(e)) => storage_status(e),
        }
    }
}

fn storage_status(err: &StorageError) -> StatusCode {
    match err {
        StorageError::NotFound(_) => StatusCode::NOT_FOUND,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = %status, error = %message, "Request failed");
        } else {
            info!(status = %status, error = %message, "API error response");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let (status, body) = body_of(StorageError::NotFound("Task").into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Task not found");
    }

    #[tokio::test]
    async fn test_validation_maps_to_400() {
        let (status, body) = body_of(StorageError::validation("Title required").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Title required");
    }

    #[tokio::test]
    async fn test_upload_rejection_maps_to_400() {
        let (status, _) = body_of(ImageError::TooManyFiles { max: 3 }.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_io_failure_maps_to_500() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let (status, body) = body_of(StorageError::Io(io).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("denied"));
    }

    #[tokio::test]
    async fn test_template_errors() {
        let (status, _) = body_of(TemplateError::NotFound.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = body_of(TemplateError::Validation("x".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
