use crate::error::AppResult;
use crate::todoist::{ListTasksOptions, Task, Todoist};
use anyhow::Context;
use log::*;

pub const NO_TASKS: &str = "No tasks found.";

/// Format tasks for the `list` command: `ID\tContent\tProject` lines under a
/// header, or a pretty-printed JSON array.
///
pub fn format_tasks(tasks: &[Task], json: bool) -> anyhow::Result<String> {
    if tasks.is_empty() {
        return Ok(NO_TASKS.to_string());
    }
    if json {
        return serde_json::to_string_pretty(tasks).context("Failed to serialize tasks to JSON");
    }
    let mut lines = vec!["ID\tContent\tProject".to_string()];
    lines.extend(
        tasks
            .iter()
            .map(|task| format!("{}\t{}\t{}", task.id, task.content, task.project_id)),
    );
    Ok(lines.join("\n"))
}

/// Fetch the first page of tasks in server order.
///
pub async fn fetch(todoist: &Todoist) -> AppResult<Vec<Task>> {
    let page = todoist.list_tasks(&ListTasksOptions::default()).await?;
    if page.next_cursor.is_some() {
        info!("More tasks are available than fit on one page; listing the first page.");
    }
    Ok(page.results)
}
