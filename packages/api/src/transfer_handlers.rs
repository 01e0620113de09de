// ABOUTME: Whole-store export and import
// ABOUTME: Import validates the payload fully before replacing anything

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use tracing::info;

use taskbook_tasks::Task;

use crate::error::{ApiError, ApiResult};
use crate::response::OkResponse;
use crate::AppState;

/// Dump every task in stored order
pub async fn export_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    info!("Exporting tasks");

    let tasks = state.tasks.export().await?;
    Ok(Json(tasks))
}

/// Replace the store with a JSON array of tasks
pub async fn import_tasks(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<OkResponse>> {
    let tasks = decode_import(&body)?;
    info!("Importing {} tasks", tasks.len());

    state.tasks.replace_all(tasks).await?;
    Ok(Json(OkResponse::new()))
}

/// Decode an import body. Anything but an array of tasks is a 400.
pub fn decode_import(body: &[u8]) -> ApiResult<Vec<Task>> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| ApiError::bad_request("Invalid format"))?;
    if !value.is_array() {
        return Err(ApiError::bad_request("Invalid format"));
    }

    serde_json::from_value(value)
        .map_err(|e| ApiError::bad_request(format!("Invalid format: {}", e)))
}
