//! Task ordering and visibility.

use crate::todoist::Task;
use std::cmp::Ordering;

/// Sort tasks ascending by due day. Tasks without a parsable due date go
/// after every dated task; ties keep their original order.
///
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare_due);
}

fn compare_due(a: &Task, b: &Task) -> Ordering {
    let a = a.due.as_ref().and_then(|due| due.day());
    let b = b.due.as_ref().and_then(|due| due.day());
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn is_visible(task: &Task, show_done: bool) -> bool {
    show_done || !task.checked
}

/// Returns the rows to display, derived from the full task list.
///
pub fn visible_tasks(tasks: &[Task], show_done: bool) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| is_visible(task, show_done))
        .collect()
}
