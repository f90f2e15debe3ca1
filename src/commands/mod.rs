//! Non-interactive entry points behind the CLI subcommands.

pub mod list;
pub mod login;
