// ABOUTME: Core constants and utilities for Taskbook
// ABOUTME: Foundational package providing shared functionality across all Taskbook packages

pub mod constants;
pub mod utils;

// Re-export constants
pub use constants::{
    images_dir, tasks_file, templates_file, DEFAULT_DATA_DIR, IMAGES_DIR_NAME,
    MAX_IMAGES_PER_TASK, MAX_IMAGE_BYTES, TASKS_FILE_NAME, TEMPLATES_FILE_NAME,
};

// Re-export utilities
pub use utils::{generate_task_id, generate_template_id, path_exists, split_tags};
