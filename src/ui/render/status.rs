use super::super::widgets::styling;
use super::Frame;
use crate::state::{StatusLevel, StatusMessage};
use ratatui::{layout::Rect, widgets::Paragraph};

/// Render the transient status message.
///
pub fn status(frame: &mut Frame, size: Rect, message: &StatusMessage) {
    let style = match message.level {
        StatusLevel::Info => styling::info_text_style(),
        StatusLevel::Error => styling::error_text_style(),
    };
    frame.render_widget(Paragraph::new(format!(" {}", message.text)).style(style), size);
}
