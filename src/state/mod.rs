//! Session state management module.
//!
//! This module contains the reactive core of the interactive session:
//! - Main `State` struct and its transition function `State::handle`
//! - `Event` and `Command` messages exchanged with the session loop
//! - Mode and status types
//! - Task ordering and the task input buffer

mod error;
mod event;
mod form;
mod navigation;
mod tasks;

pub use error::InputError;
pub use event::{Command, Event};
pub use form::TaskInput;
pub use navigation::{Mode, StatusLevel, StatusMessage};
pub use tasks::{is_visible, sort_tasks, visible_tasks};

// State struct, methods and Default impl are in state_impl.rs
#[path = "state_impl.rs"]
mod state_impl;

pub use state_impl::State;
