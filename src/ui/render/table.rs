use super::super::widgets::{spinner, styling};
use super::Frame;
use crate::state::State;
use crate::todoist::Task;
use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Row, Table, TableState},
};
use std::collections::HashMap;

pub const HEADER: [&str; 5] = ["Done", "Task", "Project", "Due", "Labels"];

const DONE: &str = "✓";
const NO_PROJECT: &str = "Unknown";
const NO_DUE_DATE: &str = "No due date";
const NO_LABELS: &str = "No labels";

/// Build the cells of one table row. Busy rows show the spinner frame in
/// place of the done marker.
///
pub fn task_row(
    task: &Task,
    project_names: &HashMap<String, String>,
    busy: bool,
    spinner_frame: &str,
) -> [String; 5] {
    let done = if busy {
        spinner_frame.to_string()
    } else if task.checked {
        DONE.to_string()
    } else {
        String::new()
    };

    let project = match project_names
        .get(&task.project_id)
        .filter(|name| !name.is_empty())
    {
        Some(name) => name.clone(),
        None if !task.project_id.is_empty() => task.project_id.clone(),
        None => NO_PROJECT.to_string(),
    };

    let due = task
        .due
        .as_ref()
        .map(|due| due.date.clone())
        .filter(|date| !date.is_empty())
        .unwrap_or_else(|| NO_DUE_DATE.to_string());

    let labels = if task.labels.is_empty() {
        NO_LABELS.to_string()
    } else {
        task.labels.join(", ")
    };

    [done, task.content.clone(), project, due, labels]
}

/// Render the task table.
///
pub fn table(frame: &mut Frame, size: Rect, state: &State) {
    let spinner_frame = spinner::frame(*state.get_spinner_index());
    let visible = state.visible_tasks();
    let rows: Vec<Row> = visible
        .iter()
        .map(|task| {
            Row::new(task_row(
                task,
                state.project_names(),
                state.is_pending(&task.id),
                spinner_frame,
            ))
        })
        .collect();

    let title = if state.show_done() {
        format!(" Tasks ({}, showing done) ", visible.len())
    } else {
        format!(" Tasks ({}) ", visible.len())
    };
    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(40),
        Constraint::Percentage(20),
        Constraint::Length(12),
        Constraint::Percentage(25),
    ];
    let table = Table::new(rows, widths)
        .header(Row::new(HEADER).style(styling::header_style()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::block_border_style())
                .title(title),
        )
        .highlight_style(styling::selected_row_style());

    let mut table_state = TableState::default();
    if !visible.is_empty() {
        table_state.select(Some(state.selected()));
    }
    frame.render_stateful_widget(table, size, &mut table_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todoist::Due;
    use fake::{Fake, Faker};

    fn names() -> HashMap<String, String> {
        let mut names = HashMap::new();
        names.insert("p1".to_string(), "Inbox".to_string());
        names
    }

    #[test]
    fn task_row_with_all_fields() {
        let task = Task {
            content: "Write report".to_string(),
            project_id: "p1".to_string(),
            due: Some(Due {
                date: "2024-01-01".to_string(),
                ..Due::default()
            }),
            labels: vec!["work".to_string(), "urgent".to_string()],
            checked: true,
            ..Faker.fake()
        };
        assert_eq!(
            task_row(&task, &names(), false, "⠋"),
            ["✓", "Write report", "Inbox", "2024-01-01", "work, urgent"]
        );
    }

    #[test]
    fn task_row_placeholders() {
        let task = Task {
            content: "Call mom".to_string(),
            project_id: String::new(),
            due: None,
            labels: vec![],
            checked: false,
            ..Faker.fake()
        };
        assert_eq!(
            task_row(&task, &names(), false, "⠋"),
            ["", "Call mom", "Unknown", "No due date", "No labels"]
        );
    }

    #[test]
    fn task_row_falls_back_to_project_id() {
        let task = Task {
            project_id: "p9".to_string(),
            ..Faker.fake()
        };
        assert_eq!(task_row(&task, &names(), false, "⠋")[2], "p9");
    }

    #[test]
    fn task_row_treats_empty_project_name_as_missing() {
        let mut names = names();
        names.insert("p2".to_string(), String::new());
        let task = Task {
            project_id: "p2".to_string(),
            ..Faker.fake()
        };
        assert_eq!(task_row(&task, &names, false, "⠋")[2], "p2");
    }

    #[test]
    fn task_row_busy_shows_spinner_over_done_marker() {
        let task = Task {
            checked: true,
            ..Faker.fake()
        };
        assert_eq!(task_row(&task, &names(), true, "⠹")[0], "⠹");
    }
}
