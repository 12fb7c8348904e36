//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;
mod gesture;

pub use args::{Args, Command};
pub use commands::{
    caps, exposure, flash, focus, handle_config_action, list_cameras, simulate, size, zoom,
    CommandError,
};
