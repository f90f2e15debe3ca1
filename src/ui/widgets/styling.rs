use ratatui::style::{Color, Modifier, Style};

const BORDER: Color = Color::Indexed(240);
const SELECTED_FG: Color = Color::Indexed(229);
const SELECTED_BG: Color = Color::Indexed(57);

/// Return the border style for blocks.
///
pub fn block_border_style() -> Style {
    Style::default().fg(BORDER)
}

/// Return the style for the table header row.
///
pub fn header_style() -> Style {
    Style::default()
        .add_modifier(Modifier::BOLD)
        .add_modifier(Modifier::UNDERLINED)
}

/// Return the style for the selected table row.
///
pub fn selected_row_style() -> Style {
    Style::default()
        .fg(SELECTED_FG)
        .bg(SELECTED_BG)
        .add_modifier(Modifier::BOLD)
}

pub fn help_text_style() -> Style {
    Style::default().fg(BORDER)
}

pub fn info_text_style() -> Style {
    Style::default().fg(Color::Green)
}

pub fn error_text_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}
