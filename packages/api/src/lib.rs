// ABOUTME: HTTP API layer for Taskbook providing REST endpoints and routing
// ABOUTME: Shared state over the task, image, and template stores plus the router

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use taskbook_core::{images_dir, tasks_file, templates_file};
use taskbook_images::ImageStore;
use taskbook_tasks::TaskStore;
use taskbook_templates::{JsonFileTemplateRepository, TemplateRepository};

pub mod calendar_handlers;
pub mod error;
pub mod health;
pub mod middleware;
pub mod multipart;
pub mod response;
pub mod tasks_handlers;
pub mod template_handlers;
pub mod transfer_handlers;

pub use error::{ApiError, ApiResult};

/// Stores shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<TaskStore>,
    pub images: Arc<ImageStore>,
    pub templates: Arc<dyn TemplateRepository>,
}

impl AppState {
    pub fn new(
        tasks: Arc<TaskStore>,
        images: Arc<ImageStore>,
        templates: Arc<dyn TemplateRepository>,
    ) -> Self {
        Self {
            tasks,
            images,
            templates,
        }
    }

    /// File-backed stores under one data directory
    pub fn open(data_dir: &Path) -> Self {
        Self::new(
            Arc::new(TaskStore::open_file(tasks_file(data_dir))),
            Arc::new(ImageStore::new(images_dir(data_dir))),
            Arc::new(JsonFileTemplateRepository::new(templates_file(data_dir))),
        )
    }

    /// Create directories and empty documents that do not exist yet
    pub async fn initialize(&self) -> anyhow::Result<()> {
        self.tasks
            .initialize()
            .await
            .context("Failed to initialize task store")?;
        self.images
            .initialize()
            .await
            .context("Failed to create image directory")?;
        self.templates
            .initialize()
            .await
            .context("Failed to initialize template store")?;
        Ok(())
    }
}

/// Creates the tasks API router (nested under /api/tasks)
pub fn create_tasks_router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks_handlers::list_tasks))
        .route("/", post(tasks_handlers::create_task))
        .route("/{id}", get(tasks_handlers::get_task))
        .route("/{id}", put(tasks_handlers::update_task))
        .route("/{id}", delete(tasks_handlers::delete_task))
        .route("/{id}/done", patch(tasks_handlers::toggle_done))
}

/// Creates the templates API router (nested under /api/templates)
pub fn create_templates_router() -> Router<AppState> {
    Router::new()
        .route("/", get(template_handlers::list_templates))
        .route("/", post(template_handlers::create_template))
        .route("/{id}", get(template_handlers::get_template))
        .route("/{id}", delete(template_handlers::delete_template))
        .route("/{id}/tasks", post(template_handlers::apply_template))
}

/// Full application router: JSON API plus image files under /images
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.images.limits().max_request_bytes();
    let images = ServeDir::new(state.images.dir());

    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api/tasks", create_tasks_router())
        .route("/api/export", get(transfer_handlers::export_tasks))
        .route("/api/import", post(transfer_handlers::import_tasks))
        .route("/api/tags", get(calendar_handlers::list_tags))
        .route("/api/calendar", get(calendar_handlers::get_calendar))
        .nest("/api/templates", create_templates_router())
        .nest_service("/images", images)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::create_panic_handler())
        .with_state(state)
}
