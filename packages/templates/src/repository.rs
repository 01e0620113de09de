// ABOUTME: Template repositories
// ABOUTME: Async trait plus JSON-file and in-memory implementations

use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use taskbook_core::generate_template_id;
use taskbook_storage::{DocumentBackend, JsonCollection, JsonFileBackend, StorageError};
use taskbook_tasks::DEFAULT_TEXT_COLOR;

use crate::types::{Template, TemplateCreateInput};

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type TemplateResult<T> = Result<T, TemplateError>;

/// Storage for templates. Implementations keep insertion order.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn initialize(&self) -> TemplateResult<()>;
    async fn list(&self) -> TemplateResult<Vec<Template>>;
    async fn get(&self, id: &str) -> TemplateResult<Template>;
    async fn create(&self, input: TemplateCreateInput) -> TemplateResult<Template>;
    async fn delete(&self, id: &str) -> TemplateResult<()>;
}

fn build_template(input: TemplateCreateInput) -> TemplateResult<Template> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(TemplateError::Validation("Template name required".into()));
    }

    Ok(Template {
        id: generate_template_id(),
        name: name.to_string(),
        title: input.title,
        content: input.content,
        text_color: input
            .text_color
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
        font_weight: input.font_weight,
        tags: input.tags,
        priority: input.priority,
        created_at: Utc::now(),
    })
}

/// Templates persisted as a JSON array (normally `<data>/templates.json`)
pub struct JsonFileTemplateRepository {
    templates: JsonCollection<Template>,
    write_lock: Mutex<()>,
}

impl JsonFileTemplateRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_backend(Arc::new(JsonFileBackend::new(path)))
    }

    pub fn with_backend(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            templates: JsonCollection::new(backend),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl TemplateRepository for JsonFileTemplateRepository {
    async fn initialize(&self) -> TemplateResult<()> {
        self.templates.initialize().await?;
        info!("Template store ready at {}", self.templates.describe());
        Ok(())
    }

    async fn list(&self) -> TemplateResult<Vec<Template>> {
        Ok(self.templates.load().await?)
    }

    async fn get(&self, id: &str) -> TemplateResult<Template> {
        self.templates
            .load()
            .await?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(TemplateError::NotFound)
    }

    async fn create(&self, input: TemplateCreateInput) -> TemplateResult<Template> {
        let template = build_template(input)?;

        let _guard = self.write_lock.lock().await;
        let mut templates = self.templates.load().await?;
        templates.push(template.clone());
        self.templates.save(&templates).await?;

        debug!("Created template: {} ({})", template.id, template.name);
        Ok(template)
    }

    async fn delete(&self, id: &str) -> TemplateResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut templates = self.templates.load().await?;
        let before = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == before {
            return Err(TemplateError::NotFound);
        }
        self.templates.save(&templates).await?;

        debug!("Deleted template: {}", id);
        Ok(())
    }
}

/// Process-local templates, lost on exit
#[derive(Default)]
pub struct InMemoryTemplateRepository {
    templates: RwLock<Vec<Template>>,
}

impl InMemoryTemplateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn initialize(&self) -> TemplateResult<()> {
        Ok(())
    }

    async fn list(&self) -> TemplateResult<Vec<Template>> {
        Ok(self.templates.read().await.clone())
    }

    async fn get(&self, id: &str) -> TemplateResult<Template> {
        self.templates
            .read()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(TemplateError::NotFound)
    }

    async fn create(&self, input: TemplateCreateInput) -> TemplateResult<Template> {
        let template = build_template(input)?;
        self.templates.write().await.push(template.clone());
        Ok(template)
    }

    async fn delete(&self, id: &str) -> TemplateResult<()> {
        let mut templates = self.templates.write().await;
        let before = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == before {
            return Err(TemplateError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str) -> TemplateCreateInput {
        TemplateCreateInput {
            name: name.to_string(),
            title: "Title".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_trims_name_and_prefixes_id() {
        let repo = InMemoryTemplateRepository::new();

        let template = repo.create(input("  Standup  ")).await.unwrap();

        assert_eq!(template.name, "Standup");
        assert!(template.id.starts_with("template-"));
        assert_eq!(template.text_color, "#000000");
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let repo = InMemoryTemplateRepository::new();
        let err = repo.create(input("   ")).await.unwrap_err();
        assert!(matches!(err, TemplateError::Validation(_)));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let repo = InMemoryTemplateRepository::new();
        repo.create(input("Keep")).await.unwrap();

        let err = repo.delete("template-missing").await.unwrap_err();

        assert!(matches!(err, TemplateError::NotFound));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_backed_json_repository() {
        let repo =
            JsonFileTemplateRepository::with_backend(Arc::new(taskbook_storage::MemoryBackend::new()));

        let first = repo.create(input("First")).await.unwrap();
        let second = repo.create(input("Second")).await.unwrap();
        repo.delete(&first.id).await.unwrap();

        let remaining = repo.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second.id);
        assert_eq!(repo.get(&second.id).await.unwrap().name, "Second");
    }
}
