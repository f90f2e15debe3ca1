//! Terminal user interface for Todoist.
//!
//! `login` runs the OAuth authorization-code flow and stores the resulting
//! token; the interactive session lists, completes and creates tasks.

pub mod app;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod logger;
pub mod state;
pub mod todoist;
pub mod ui;
