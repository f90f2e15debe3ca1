//! Messages flowing through the session loop.
//!
//! Everything the state machine reacts to is an `Event`. Anything it wants
//! done outside of itself is a `Command`, which the loop executes and answers
//! with another `Event`.

use crate::todoist::{ApiError, Snapshot};
use crossterm::event::KeyEvent;

/// Input to `State::handle`.
///
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    /// Answer to the `Reload` with the same generation.
    ReloadResult {
        generation: u64,
        result: Result<Snapshot, ApiError>,
    },
    ToggleDoneResult {
        id: String,
        /// Value `checked` takes once the call succeeds.
        checked: bool,
        result: Result<(), ApiError>,
    },
    CreateTaskResult(Result<(), ApiError>),
}

/// Effect requested by `State::handle`.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Fetch a fresh snapshot. Results of older generations are dropped.
    Reload {
        generation: u64,
    },
    /// `checked` is the value before the toggle: reopen when true, close
    /// otherwise.
    ToggleDone {
        id: String,
        checked: bool,
    },
    CreateTask {
        content: String,
    },
}
