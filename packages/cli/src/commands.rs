// ABOUTME: Offline commands that work on the data directory without a server
// ABOUTME: Export, import, and a table listing of tasks

use anyhow::{bail, Context};
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use std::path::Path;
use tokio::fs;

use taskbook_api::transfer_handlers::decode_import;
use taskbook_core::{path_exists, tasks_file};
use taskbook_tasks::{StatusFilter, Task, TaskQuery, TaskStore};

fn open_store(data_dir: &Path) -> TaskStore {
    TaskStore::open_file(tasks_file(data_dir))
}

/// Write every task as pretty JSON to a file, or stdout when `output` is `None`
pub async fn export_tasks(data_dir: &Path, output: Option<&Path>) -> anyhow::Result<usize> {
    let tasks = open_store(data_dir).export().await?;
    let json = serde_json::to_string_pretty(&tasks)?;

    match output {
        Some(path) => fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }

    Ok(tasks.len())
}

/// Replace the store with the tasks in a JSON file
pub async fn import_tasks(data_dir: &Path, input: &Path) -> anyhow::Result<usize> {
    if !path_exists(input).await {
        bail!("File not found: {}", input.display());
    }
    let bytes = fs::read(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let tasks = decode_import(&bytes)?;
    let count = tasks.len();

    let store = open_store(data_dir);
    store.initialize().await?;
    store.replace_all(tasks).await?;

    Ok(count)
}

/// Print tasks in display order
pub async fn list_tasks(
    data_dir: &Path,
    filter: Option<&str>,
    tag: Option<String>,
) -> anyhow::Result<()> {
    let query = TaskQuery {
        status: filter.map(StatusFilter::parse_lenient).unwrap_or_default(),
        tag,
        search: None,
    };
    let tasks = open_store(data_dir).list(&query).await?;

    if tasks.is_empty() {
        println!("{}", "No tasks found".yellow());
        return Ok(());
    }

    println!("{}", render_table(&tasks));
    println!("Total: {} tasks", tasks.len().to_string().cyan());
    Ok(())
}

fn render_table(tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["Done", "Title", "Priority", "Due", "Tags", "Images"]);

    for task in tasks {
        let due = task
            .due_at
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            if task.done { "x" } else { " " }.to_string(),
            truncate(&task.title, 40),
            task.priority.to_string(),
            due,
            truncate(&task.tags.join(", "), 24),
            task.images.len().to_string(),
        ]);
    }

    table
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
