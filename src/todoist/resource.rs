use chrono::NaiveDate;
use fake::Dummy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Defines due date data structure.
///
#[derive(Clone, Debug, Default, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
}

impl Due {
    /// Returns the calendar day of the due date, ignoring any time component.
    /// Both `2024-01-01` and `2024-01-01T12:00:00` yield the same day.
    ///
    pub fn day(&self) -> Option<NaiveDate> {
        let day = self.date.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

/// Defines deadline data structure.
///
#[derive(Clone, Debug, Default, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// Defines task duration data structure.
///
#[derive(Clone, Debug, Default, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDuration {
    #[serde(default)]
    pub amount: u32,
    #[serde(default)]
    pub unit: String, // minute or day
}

/// Defines task data structure.
///
#[derive(Clone, Debug, Default, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub section_id: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub due: Option<Due>,
    #[serde(default)]
    pub deadline: Option<Deadline>,
    #[serde(default)]
    pub duration: Option<TaskDuration>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub priority: u8, // 1 (normal) through 4 (urgent)
    #[serde(default)]
    pub child_order: i64,
    #[serde(default)]
    pub note_count: u32,
    #[serde(default)]
    pub added_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Defines project data structure.
///
#[derive(Clone, Debug, Default, Dummy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub inbox_project: bool,
}

/// One page of tasks and the cursor for the next page, if any.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskPage {
    pub results: Vec<Task>,
    pub next_cursor: Option<String>,
}

/// One page of projects and the cursor for the next page, if any.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectPage {
    pub results: Vec<Project>,
    pub next_cursor: Option<String>,
}

/// Query options for listing tasks.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListTasksOptions {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

/// Request body for task creation. Only `content` is required.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CreateTaskOptions {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_date: Option<String>,
}

impl CreateTaskOptions {
    /// Returns options creating a task with the given content only.
    ///
    pub fn new(content: impl Into<String>) -> Self {
        CreateTaskOptions {
            content: content.into(),
            ..CreateTaskOptions::default()
        }
    }
}

/// Token endpoint response for the authorization-code exchange.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Tasks and the project name lookup loaded together for the session.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub project_names: HashMap<String, String>,
}

impl Snapshot {
    /// Builds a snapshot from a task list and the projects they belong to.
    ///
    pub fn new(tasks: Vec<Task>, projects: Vec<Project>) -> Self {
        Snapshot {
            tasks,
            project_names: projects.into_iter().map(|p| (p.id, p.name)).collect(),
        }
    }
}
