//! Task composition input.
//!
//! A single-line buffer over `tui_textarea::TextArea`. Confirm and cancel
//! keys are resolved by the state machine before anything reaches here.

use super::InputError;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::TextArea;

pub const PLACEHOLDER: &str = "Task content";
pub const CHAR_LIMIT: usize = 156;

/// Input buffer for new task content.
///
pub struct TaskInput {
    textarea: TextArea<'static>,
}

impl Default for TaskInput {
    fn default() -> Self {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text(PLACEHOLDER);
        TaskInput { textarea }
    }
}

impl TaskInput {
    /// Feed a key to the buffer. Line breaks and input past the character
    /// limit are dropped.
    ///
    pub fn input(&mut self, key: KeyEvent) -> bool {
        let is_line_break = match key.code {
            KeyCode::Enter => true,
            KeyCode::Char('m') | KeyCode::Char('j') => key.modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        };
        if is_line_break {
            return false;
        }
        let inserts_char = matches!(key.code, KeyCode::Char(_))
            && !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        if inserts_char && self.len() >= CHAR_LIMIT {
            return false;
        }
        self.textarea.input(key)
    }

    /// Raw buffer contents.
    ///
    pub fn value(&self) -> String {
        self.textarea.lines().join(" ")
    }

    /// Trimmed buffer contents, or `EmptyContent` when nothing is left.
    ///
    pub fn content(&self) -> Result<String, InputError> {
        let value = self.value();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(InputError::EmptyContent)
        } else {
            Ok(trimmed.to_string())
        }
    }

    pub fn clear(&mut self) {
        *self = TaskInput::default();
    }

    pub fn len(&self) -> usize {
        self.textarea.lines().iter().map(|line| line.chars().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }
}
