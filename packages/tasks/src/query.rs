// ABOUTME: List filtering, searching, and ordering for tasks
// ABOUTME: Completion/tag filters, free-text search, and the default comparator

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::types::Task;

/// Completion filter accepted by the list endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Done,
}

impl StatusFilter {
    /// Unknown values fall back to `All`
    pub fn parse_lenient(raw: &str) -> Self {
        match raw {
            "active" => StatusFilter::Active,
            "done" => StatusFilter::Done,
            _ => StatusFilter::All,
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.done,
            StatusFilter::Done => task.done,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub status: StatusFilter,
    pub tag: Option<String>,
    pub search: Option<String>,
}

impl TaskQuery {
    pub fn matches(&self, task: &Task) -> bool {
        if !self.status.matches(task) {
            return false;
        }
        if let Some(tag) = self.tag.as_deref().filter(|t| !t.is_empty()) {
            if !task.has_tag(tag) {
                return false;
            }
        }
        match self.search.as_deref() {
            Some(q) => matches_search(task, q),
            None => true,
        }
    }

    /// Filter then sort into the default list order
    pub fn apply(&self, tasks: Vec<Task>) -> Vec<Task> {
        let mut tasks: Vec<Task> = tasks.into_iter().filter(|t| self.matches(t)).collect();
        sort_tasks(&mut tasks);
        tasks
    }
}

/// Case-insensitive substring match over title, content, and tags.
/// A blank query matches everything.
pub fn matches_search(task: &Task, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    task.title.to_lowercase().contains(&query)
        || task.content.to_lowercase().contains(&query)
        || task.tags.iter().any(|t| t.to_lowercase().contains(&query))
}

/// Default order: open before done, then high > medium > low,
/// then earliest due date with undated tasks last
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.done
        .cmp(&b.done)
        .then_with(|| a.priority.rank().cmp(&b.priority.rank()))
        .then_with(|| match (a.due_at, b.due_at) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Stable sort into the default order
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Distinct tags across tasks, most used first.
/// A tag repeated within one task counts once for that task.
pub fn tag_counts(tasks: &[Task]) -> Vec<TagCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for task in tasks {
        let mut seen: Vec<&str> = Vec::new();
        for tag in &task.tags {
            if !seen.contains(&tag.as_str()) {
                seen.push(tag.as_str());
                *counts.entry(tag.as_str()).or_default() += 1;
            }
        }
    }

    let mut result: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    result
}
