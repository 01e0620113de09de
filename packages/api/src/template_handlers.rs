// ABOUTME: HTTP request handlers for task templates
// ABOUTME: Lists, saves, and deletes presets, and creates tasks from them

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use tracing::info;

use taskbook_templates::{Template, TemplateCreateInput};

use crate::error::{ApiError, ApiResult};
use crate::response::{OkResponse, TaskResponse, TemplateResponse};
use crate::AppState;

/// List all templates in the order they were saved
pub async fn list_templates(State(state): State<AppState>) -> ApiResult<Json<Vec<Template>>> {
    info!("Listing templates");

    let templates = state.templates.list().await?;
    Ok(Json(templates))
}

/// Get a specific template by ID
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Template>> {
    info!("Getting template: {}", id);

    let template = state.templates.get(&id).await?;
    Ok(Json(template))
}

/// Save a new template from a JSON body
pub async fn create_template(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<TemplateResponse>> {
    let input: TemplateCreateInput = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid template: {}", e)))?;
    info!("Creating template '{}'", input.name);

    let template = state.templates.create(input).await?;
    Ok(Json(TemplateResponse::new(template)))
}

/// Delete a template
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OkResponse>> {
    info!("Deleting template: {}", id);

    state.templates.delete(&id).await?;
    Ok(Json(OkResponse::new()))
}

/// Create a task prefilled from a template
pub async fn apply_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskResponse>> {
    info!("Creating task from template: {}", id);

    let template = state.templates.get(&id).await?;
    let task = state.tasks.create(template.to_task_input()).await?;
    Ok(Json(TaskResponse::new(task)))
}
