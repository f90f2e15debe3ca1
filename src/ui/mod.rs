//! User interface module.
//!
//! This module handles all UI rendering using the `ratatui` library, including:
//! - The task table and its row formatting
//! - The footer help line, status line and task input box
//! - Widget components (spinner, styling)
//!
//! Rendering only reads `State`.

type Frame<'a> = ratatui::Frame<'a>;

mod render;
mod widgets;

pub const SPINNER_FRAME_COUNT: usize = widgets::spinner::FRAMES.len();

pub use render::render;
pub use render::table::{task_row, HEADER};
