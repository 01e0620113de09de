// ABOUTME: Shared utility functions for Taskbook
// ABOUTME: ID generation, tag parsing, path operations

use std::path::Path;
use tokio::fs;

/// Generate a unique task ID (UUID v4)
pub fn generate_task_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generate a template ID like `template-V1StGXR8_Z5jdHi6B-myT`
pub fn generate_template_id() -> String {
    format!("template-{}", nanoid::nanoid!())
}

/// Split a comma-separated tag string, trimming entries and dropping empties.
/// Duplicates are kept.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Checks if a path exists
pub async fn path_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).await.is_ok()
}
