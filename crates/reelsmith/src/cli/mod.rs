//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the reelsmith binary.

mod clear;
mod commands;
mod run;
mod status;

pub use clear::clear_field;
pub use commands::{Cli, Commands, RunArgs};
pub use run::run_job;
pub use status::show_status;
