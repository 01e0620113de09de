// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Taskbook

// Server
pub const TASKBOOK_PORT: &str = "TASKBOOK_PORT";
pub const PORT: &str = "PORT"; // Legacy
pub const TASKBOOK_HOST: &str = "TASKBOOK_HOST";

// Storage
pub const TASKBOOK_DATA_DIR: &str = "TASKBOOK_DATA_DIR";

// CORS
pub const TASKBOOK_CORS_ORIGIN: &str = "TASKBOOK_CORS_ORIGIN";

// Static client bundle
pub const TASKBOOK_UI_DIR: &str = "TASKBOOK_UI_DIR";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";
