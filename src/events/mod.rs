//! Event handling module.
//!
//! This module contains the two producers feeding the session loop besides
//! the loop itself:
//! - Network: executes commands against the Todoist API and answers with events
//! - Terminal: polls user input and emits ticks

pub mod network;
pub mod terminal;
