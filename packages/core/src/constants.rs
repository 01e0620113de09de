// ABOUTME: Storage layout and limit constants
// ABOUTME: File names under the data directory and per-task image limits

use std::path::{Path, PathBuf};

/// File holding the task array
pub const TASKS_FILE_NAME: &str = "tasks.json";

/// File holding saved templates
pub const TEMPLATES_FILE_NAME: &str = "templates.json";

/// Directory (under the data dir) holding uploaded images.
/// Also the prefix of every image path stored on a task.
pub const IMAGES_DIR_NAME: &str = "images";

/// A task never references more than this many images
pub const MAX_IMAGES_PER_TASK: usize = 3;

/// Per-file upload limit (5 MiB)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Data directory used when none is configured
pub const DEFAULT_DATA_DIR: &str = "data";

/// Get the path to tasks.json inside a data directory
pub fn tasks_file(data_dir: &Path) -> PathBuf {
    data_dir.join(TASKS_FILE_NAME)
}

/// Get the path to templates.json inside a data directory
pub fn templates_file(data_dir: &Path) -> PathBuf {
    data_dir.join(TEMPLATES_FILE_NAME)
}

/// Get the image directory inside a data directory
pub fn images_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(IMAGES_DIR_NAME)
}
