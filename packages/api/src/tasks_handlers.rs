// ABOUTME: HTTP request handlers for task operations
// ABOUTME: CRUD and completion toggling, with image files kept in step with task records

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use taskbook_tasks::{StatusFilter, Task, TaskQuery};

use crate::error::ApiResult;
use crate::multipart::TaskForm;
use crate::response::{OkResponse, TaskResponse};
use crate::AppState;

/// Query string of the list and calendar endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub filter: Option<String>,
    pub tag: Option<String>,
    pub q: Option<String>,
}

impl ListParams {
    pub fn to_query(&self) -> TaskQuery {
        TaskQuery {
            status: self
                .filter
                .as_deref()
                .map(StatusFilter::parse_lenient)
                .unwrap_or_default(),
            tag: self.tag.clone().filter(|t| !t.is_empty()),
            search: self.q.clone().filter(|q| !q.trim().is_empty()),
        }
    }
}

/// List tasks, filtered and in display order
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Task>>> {
    info!(
        "Listing tasks (filter: {:?}, tag: {:?}, q: {:?})",
        params.filter, params.tag, params.q
    );

    let tasks = state.tasks.list(&params.to_query()).await?;
    Ok(Json(tasks))
}

/// Get a single task by ID
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    info!("Getting task: {}", id);

    let task = state.tasks.get(&id).await?;
    Ok(Json(task))
}

/// Create a task from a multipart form with up to three images
pub async fn create_task(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<TaskResponse>> {
    let form = TaskForm::read(multipart, state.images.limits()).await?;
    let mut input = form.create_input()?;
    info!(
        "Creating task '{}' with {} images",
        input.title,
        form.images.len()
    );

    let saved = state.images.save_batch(&form.images).await?;
    input.images = saved.clone();

    match state.tasks.create(input).await {
        Ok(task) => Ok(Json(TaskResponse::new(task))),
        Err(e) => {
            state.images.delete_all(&saved).await;
            Err(e.into())
        }
    }
}

/// Update a task, adding and removing images
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<TaskResponse>> {
    let form = TaskForm::read(multipart, state.images.limits()).await?;
    let mut input = form.update_input()?;
    info!(
        "Updating task: {} (+{} images, -{} images)",
        id,
        form.images.len(),
        input.remove_images.len()
    );

    let saved = state.images.save_batch(&form.images).await?;
    input.add_images = saved.clone();

    match state.tasks.update(&id, input).await {
        Ok(outcome) => {
            if !outcome.rejected_images.is_empty() {
                warn!(
                    "Task {} is full, discarding {} uploaded images",
                    id,
                    outcome.rejected_images.len()
                );
            }
            let orphaned: Vec<&String> = outcome.orphaned_images().collect();
            state.images.delete_all(&orphaned).await;
            Ok(Json(TaskResponse::new(outcome.task)))
        }
        Err(e) => {
            state.images.delete_all(&saved).await;
            Err(e.into())
        }
    }
}

/// Flip a task's completion flag
pub async fn toggle_done(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskResponse>> {
    info!("Toggling task: {}", id);

    let task = state.tasks.set_done(&id).await?;
    Ok(Json(TaskResponse::new(task)))
}

/// Delete a task and its image files
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OkResponse>> {
    info!("Deleting task: {}", id);

    let task = state.tasks.delete(&id).await?;
    state.images.delete_all(&task.images).await;
    Ok(Json(OkResponse::new()))
}
