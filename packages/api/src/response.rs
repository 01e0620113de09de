// ABOUTME: Success bodies shared by the handlers
// ABOUTME: `{ok: true}` acknowledgements, optionally carrying the affected record

use serde::Serialize;

use taskbook_tasks::Task;
use taskbook_templates::Template;

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub ok: bool,
    pub task: Task,
}

impl TaskResponse {
    pub fn new(task: Task) -> Self {
        Self { ok: true, task }
    }
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub ok: bool,
    pub template: Template,
}

impl TemplateResponse {
    pub fn new(template: Template) -> Self {
        Self { ok: true, template }
    }
}
