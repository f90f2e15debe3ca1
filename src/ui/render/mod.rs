mod footer;
mod input;
mod status;
pub(crate) mod table;

use super::*;
use crate::state::{Mode, State};
use footer::footer;
use input::input;
use ratatui::layout::{Constraint, Direction, Layout};
use status::status;
use table::table;

const INPUT_HEIGHT: u16 = 3;

/// Render the whole session screen: the task table, then the input box
/// while composing, then the status line if any, then the footer.
///
pub fn render(frame: &mut Frame, state: &State) {
    let composing = state.mode() == Mode::ComposingTask;
    let message = state.get_status();

    let mut constraints = vec![Constraint::Min(3)];
    if composing {
        constraints.push(Constraint::Length(INPUT_HEIGHT));
    }
    if message.is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.size());

    let mut chunk = chunks.iter().copied();
    if let Some(area) = chunk.next() {
        table(frame, area, state);
    }
    if composing {
        if let Some(area) = chunk.next() {
            input(frame, area, state);
        }
    }
    if let Some(message) = message {
        if let Some(area) = chunk.next() {
            status(frame, area, message);
        }
    }
    if let Some(area) = chunk.next() {
        footer(frame, area, state);
    }
}
