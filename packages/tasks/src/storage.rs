// ABOUTME: Task storage over a whole-document JSON backend
// ABOUTME: CRUD, completion toggling, and import/export with single-writer mutations

use chrono::Utc;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use taskbook_core::{generate_task_id, MAX_IMAGES_PER_TASK};
use taskbook_storage::{
    DocumentBackend, JsonCollection, JsonFileBackend, MemoryBackend, StorageError, StorageResult,
};

use crate::calendar::{CalendarMonth, CalendarView};
use crate::query::{tag_counts, TagCount, TaskQuery};
use crate::types::{Task, TaskCreateInput, TaskUpdateInput, TaskUpdateOutcome, DEFAULT_TEXT_COLOR};

/// The task collection.
///
/// Every call reloads the full document. Mutations hold `write_lock` across
/// load-modify-save, so writers in this process never overwrite each other.
/// Another process writing the same file is not coordinated with.
pub struct TaskStore {
    tasks: JsonCollection<Task>,
    write_lock: Mutex<()>,
}

impl TaskStore {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            tasks: JsonCollection::new(backend),
            write_lock: Mutex::new(()),
        }
    }

    /// Store backed by a JSON file (normally `<data>/tasks.json`)
    pub fn open_file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(JsonFileBackend::new(path)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub async fn initialize(&self) -> StorageResult<()> {
        self.tasks.initialize().await?;
        info!("Task store ready at {}", self.tasks.describe());
        Ok(())
    }

    /// Filtered tasks in the default list order
    pub async fn list(&self, query: &TaskQuery) -> StorageResult<Vec<Task>> {
        let tasks = self.tasks.load().await?;
        Ok(query.apply(tasks))
    }

    /// All tasks in stored order
    pub async fn export(&self) -> StorageResult<Vec<Task>> {
        self.tasks.load().await
    }

    pub async fn get(&self, id: &str) -> StorageResult<Task> {
        debug!("Fetching task: {}", id);
        self.tasks
            .load()
            .await?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or(StorageError::NotFound("Task"))
    }

    pub async fn create(&self, input: TaskCreateInput) -> StorageResult<Task> {
        if input.title.trim().is_empty() {
            return Err(StorageError::validation("Title required"));
        }
        if input.images.len() > MAX_IMAGES_PER_TASK {
            return Err(StorageError::validation(format!(
                "A task holds at most {} images",
                MAX_IMAGES_PER_TASK
            )));
        }

        let now = Utc::now();
        let task = Task {
            id: generate_task_id(),
            title: input.title,
            content: input.content.unwrap_or_default(),
            text_color: input
                .text_color
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
            font_weight: input.font_weight.unwrap_or_default(),
            images: input.images,
            tags: input.tags,
            due_at: input.due_at,
            priority: input.priority.unwrap_or_default(),
            done: false,
            created_at: now,
            updated_at: now,
        };

        let _guard = self.write_lock.lock().await;
        let mut tasks = self.tasks.load().await?;
        tasks.push(task.clone());
        self.tasks.save(&tasks).await?;

        debug!("Created task: {}", task.id);
        Ok(task)
    }

    pub async fn update(&self, id: &str, input: TaskUpdateInput) -> StorageResult<TaskUpdateOutcome> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.tasks.load().await?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StorageError::NotFound("Task"))?;

        // Only paths this task actually holds are released
        let mut removed_images = Vec::new();
        if !input.remove_images.is_empty() {
            task.images.retain(|img| {
                if input.remove_images.contains(img) {
                    removed_images.push(img.clone());
                    false
                } else {
                    true
                }
            });
        }

        let mut rejected_images = Vec::new();
        for path in input.add_images {
            if task.images.len() < MAX_IMAGES_PER_TASK {
                task.images.push(path);
            } else {
                rejected_images.push(path);
            }
        }

        if let Some(title) = input.title.filter(|t| !t.trim().is_empty()) {
            task.title = title;
        }
        if let Some(content) = input.content {
            task.content = content;
        }
        if let Some(color) = input.text_color.filter(|c| !c.is_empty()) {
            task.text_color = color;
        }
        if let Some(weight) = input.font_weight {
            task.font_weight = weight;
        }
        if let Some(due_at) = input.due_at {
            task.due_at = due_at;
        }
        if let Some(priority) = input.priority {
            task.priority = priority;
        }
        if let Some(tags) = input.tags {
            task.tags = tags;
        }
        task.touch();

        let task = task.clone();
        self.tasks.save(&tasks).await?;

        debug!(
            "Updated task: {} (removed {} images, rejected {})",
            task.id,
            removed_images.len(),
            rejected_images.len()
        );
        Ok(TaskUpdateOutcome {
            task,
            removed_images,
            rejected_images,
        })
    }

    /// Flip the completion flag
    pub async fn set_done(&self, id: &str) -> StorageResult<Task> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.tasks.load().await?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StorageError::NotFound("Task"))?;

        task.done = !task.done;
        task.touch();

        let task = task.clone();
        self.tasks.save(&tasks).await?;

        debug!("Task {} done={}", task.id, task.done);
        Ok(task)
    }

    /// Remove a task and return it, so its images can be purged
    pub async fn delete(&self, id: &str) -> StorageResult<Task> {
        let _guard = self.write_lock.lock().await;
        let mut tasks = self.tasks.load().await?;
        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StorageError::NotFound("Task"))?;

        let removed = tasks.remove(index);
        self.tasks.save(&tasks).await?;

        debug!("Deleted task: {}", removed.id);
        Ok(removed)
    }

    /// Replace the whole collection (import)
    pub async fn replace_all(&self, tasks: Vec<Task>) -> StorageResult<()> {
        validate_collection(&tasks)?;

        let _guard = self.write_lock.lock().await;
        self.tasks.save(&tasks).await?;

        info!("Imported {} tasks", tasks.len());
        Ok(())
    }

    pub async fn tags(&self) -> StorageResult<Vec<TagCount>> {
        let tasks = self.tasks.load().await?;
        Ok(tag_counts(&tasks))
    }

    pub async fn calendar(
        &self,
        month: CalendarMonth,
        query: &TaskQuery,
    ) -> StorageResult<CalendarView> {
        let tasks = self.list(query).await?;
        Ok(CalendarView::build(month, &tasks))
    }
}

/// Reject collections that break store invariants.
/// Each image path may be referenced once, since deleting a task deletes its files.
fn validate_collection(tasks: &[Task]) -> StorageResult<()> {
    let mut ids = HashSet::with_capacity(tasks.len());
    let mut images = HashSet::new();
    for task in tasks {
        if !ids.insert(task.id.as_str()) {
            return Err(StorageError::InvalidFormat(format!(
                "Duplicate task id: {}",
                task.id
            )));
        }
        if task.images.len() > MAX_IMAGES_PER_TASK {
            return Err(StorageError::InvalidFormat(format!(
                "Task {} has more than {} images",
                task.id, MAX_IMAGES_PER_TASK
            )));
        }
        if let Some(path) = task.images.iter().find(|p| !images.insert(p.as_str())) {
            return Err(StorageError::InvalidFormat(format!(
                "Image {} is referenced more than once",
                path
            )));
        }
    }
    Ok(())
}
