// ABOUTME: Task type definitions
// ABOUTME: Persisted task record plus the create/update inputs the store accepts

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_TEXT_COLOR: &str = "#000000";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// Position in the default list order (high first)
    pub fn rank(self) -> u8 {
        match self {
            TaskPriority::High => 0,
            TaskPriority::Medium => 1,
            TaskPriority::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FromStr for FontWeight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(FontWeight::Normal),
            "bold" => Ok(FontWeight::Bold),
            _ => Err(format!("Invalid font weight: {}", s)),
        }
    }
}

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

/// A notebook entry as persisted in tasks.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub done: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Refresh `updated_at`, always moving it forward
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskCreateInput {
    pub title: String,
    pub content: Option<String>,
    pub text_color: Option<String>,
    pub font_weight: Option<FontWeight>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub priority: Option<TaskPriority>,
}

/// Partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdateInput {
    /// Ignored when blank
    pub title: Option<String>,
    pub content: Option<String>,
    pub text_color: Option<String>,
    pub font_weight: Option<FontWeight>,
    /// `Some(None)` clears the due date
    pub due_at: Option<Option<DateTime<Utc>>>,
    pub priority: Option<TaskPriority>,
    pub tags: Option<Vec<String>>,
    /// Paths to drop from the task, applied before `add_images`
    pub remove_images: Vec<String>,
    /// Newly stored paths to append (the list is capped afterwards)
    pub add_images: Vec<String>,
}

/// Result of an update, including image paths whose files the caller should delete
#[derive(Debug, Clone)]
pub struct TaskUpdateOutcome {
    pub task: Task,
    /// Paths the task held and no longer references
    pub removed_images: Vec<String>,
    /// Newly added paths that did not fit under the per-task cap
    pub rejected_images: Vec<String>,
}

impl TaskUpdateOutcome {
    /// Every path whose file is now unreferenced
    pub fn orphaned_images(&self) -> impl Iterator<Item = &String> {
        self.removed_images.iter().chain(self.rejected_images.iter())
    }
}
