//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod commands;
mod config;
mod logging;
mod session;

pub use commands::{handle_aliases, handle_bench, handle_watch};
pub use config::{ConfigSubcommand, handle_config_command};
pub use logging::init_logging;
pub use session::KubeContext;
