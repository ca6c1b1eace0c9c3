//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod completions;
mod config;
mod sample;
mod utils;
mod validate;

pub use completions::handle_completions;
pub use config::handle_config;
pub use sample::handle_sample;
pub use test::handle_test;
pub use validate::handle_validate;
