// ABOUTME: Reusable task presets
// ABOUTME: Provides template types and repositories kept apart from the task store

pub mod repository;
pub mod types;

// Re-export main types
pub use repository::{
    InMemoryTemplateRepository, JsonFileTemplateRepository, TemplateError, TemplateRepository,
    TemplateResult,
};
pub use types::{Template, TemplateCreateInput};
