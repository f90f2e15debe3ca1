//! Session mode and status message types.

/// Specifying which keys the session is listening for.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Mode {
    #[default]
    Browsing,
    ComposingTask,
}

/// Severity of a status message.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StatusLevel {
    Info,
    Error,
}

/// Transient message shown until the next key press.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        StatusMessage {
            text: text.into(),
            level: StatusLevel::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusMessage {
            text: text.into(),
            level: StatusLevel::Error,
        }
    }
}
