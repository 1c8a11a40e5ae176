//! Command line interface.
//!
//! Handlers here only deal with terminal presentation; the work itself is
//! done by the pipeline and normalizer modules.

pub mod args;
pub mod clean;
pub mod config;
pub mod fetch;

pub use args::{
    CleanCliArgs, Cli, CliCommand, ConfigCliArgs, ConfigCommand, ConfigSetArgs, FetchCliArgs,
    ServeCliArgs,
};
pub use clean::handle_clean_command;
pub use config::handle_config_command;
pub use fetch::handle_fetch_command;
