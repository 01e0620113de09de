// ABOUTME: Template type definitions
// ABOUTME: Preset task fields saved under a name and turned back into create inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use taskbook_core::split_tags;
use taskbook_tasks::{FontWeight, TaskCreateInput, TaskPriority, DEFAULT_TEXT_COLOR};

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Template {
    /// Fields for a new task. Templates carry no images or due date.
    pub fn to_task_input(&self) -> TaskCreateInput {
        TaskCreateInput {
            title: self.title.clone(),
            content: Some(self.content.clone()),
            text_color: Some(self.text_color.clone()),
            font_weight: Some(self.font_weight),
            images: Vec::new(),
            tags: self.tags.clone(),
            due_at: None,
            priority: Some(self.priority),
        }
    }
}

/// Body of `POST /api/templates`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCreateInput {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Either a list or the editor's comma-separated string
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priority: TaskPriority,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsField {
    List(Vec<String>),
    Csv(String),
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match Option::<TagsField>::deserialize(deserializer)? {
        Some(TagsField::List(list)) => list
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        Some(TagsField::Csv(raw)) => split_tags(&raw),
        None => Vec::new(),
    };
    Ok(tags)
}
