// ABOUTME: HTTP server bootstrap
// ABOUTME: Opens the stores, adds CORS and the optional client bundle, and serves

use anyhow::Context;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
};
use tracing::info;

use taskbook_api::{create_router, AppState};

use crate::config::{Config, ConfigError};

/// CORS layer for the configured origin (`*` allows any)
pub fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    if origin == "*" {
        return Ok(cors.allow_origin(Any));
    }

    let origin = origin
        .parse::<HeaderValue>()
        .map_err(|_| ConfigError::InvalidCorsOrigin(origin.to_string()))?;
    Ok(cors.allow_origin(origin))
}

/// API router plus CORS and, when configured, the client bundle with
/// `index.html` as the fallback for client-side routes
pub fn build_app(config: &Config, state: AppState) -> Result<Router, ConfigError> {
    let mut app = create_router(state);

    if let Some(ui_dir) = &config.ui_dir {
        let index = ui_dir.join("index.html");
        app = app.fallback_service(ServeDir::new(ui_dir).fallback(ServeFile::new(index)));
    }

    Ok(app.layer(cors_layer(&config.cors_origin)?))
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let state = AppState::open(&config.data_dir);
    state.initialize().await?;

    let app = build_app(&config, state)?;

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Data directory: {}", config.data_dir.display());
    if let Some(ui_dir) = &config.ui_dir {
        info!("Serving client from {}", ui_dir.display());
    }
    info!("Taskbook listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
