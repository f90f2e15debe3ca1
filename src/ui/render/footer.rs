use super::super::widgets::{spinner, styling};
use super::Frame;
use crate::config::hotkeys::{build_footer_text, HotkeyAction};
use crate::state::{Mode, State};
use ratatui::{layout::Rect, text::Line, widgets::Paragraph};

/// Format the help line for the current mode.
///
pub fn footer_text(state: &State) -> String {
    let hotkeys = state.get_hotkeys();
    let help = match state.mode() {
        Mode::Browsing => {
            let filter = if state.show_done() {
                "hide done"
            } else {
                "show done"
            };
            build_footer_text(
                &hotkeys.browsing,
                &[
                    (HotkeyAction::NavigateNext, "down"),
                    (HotkeyAction::NavigatePrev, "up"),
                    (HotkeyAction::ToggleDone, "toggle done"),
                    (HotkeyAction::AddTask, "add task"),
                    (HotkeyAction::ToggleFilter, filter),
                    (HotkeyAction::Reload, "reload"),
                    (HotkeyAction::Quit, "quit"),
                ],
            )
        }
        Mode::ComposingTask => build_footer_text(
            &hotkeys.composing,
            &[
                (HotkeyAction::Confirm, "save"),
                (HotkeyAction::Cancel, "cancel"),
            ],
        ),
    };

    if state.is_loading() {
        format!(
            " {} Loading...{}",
            spinner::frame(*state.get_spinner_index()),
            help
        )
    } else {
        help
    }
}

/// Render the footer help line.
///
pub fn footer(frame: &mut Frame, size: Rect, state: &State) {
    let paragraph =
        Paragraph::new(Line::from(footer_text(state))).style(styling::help_text_style());
    frame.render_widget(paragraph, size);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::hotkeys::SessionHotkeys;
    use crate::state::Event;
    use crate::todoist::Snapshot;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(state: &mut State, code: KeyCode) {
        state.handle(Event::Key(KeyEvent::new(code, KeyModifiers::empty())));
    }

    #[test]
    fn browsing_help_follows_filter() {
        let mut state = State::new(Snapshot::default(), SessionHotkeys::default());
        let text = footer_text(&state);
        assert!(text.contains("q: quit"));
        assert!(text.contains("show done"));

        press(&mut state, KeyCode::Char('f'));
        assert!(footer_text(&state).contains("hide done"));
    }

    #[test]
    fn composing_help_lists_save_and_cancel() {
        let mut state = State::new(Snapshot::default(), SessionHotkeys::default());
        press(&mut state, KeyCode::Char('a'));
        let text = footer_text(&state);
        assert!(text.contains("save"));
        assert!(text.contains("cancel"));
        assert!(!text.contains("quit"));
    }
}
