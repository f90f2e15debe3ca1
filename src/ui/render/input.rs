use super::super::widgets::styling;
use super::Frame;
use crate::state::State;
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
};

/// Render the task input box.
///
pub fn input(frame: &mut Frame, size: Rect, state: &State) {
    let mut textarea = state.input().textarea().clone();
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styling::block_border_style())
            .title(" New task "),
    );
    frame.render_widget(textarea.widget(), size);
}
