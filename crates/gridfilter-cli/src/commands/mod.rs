//! Command implementations for the gf CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod chips;
pub mod completions;
pub mod config;
pub mod filter;
pub mod input;
pub mod optimize;
pub mod parse;
pub mod types;
pub mod values;

use gridfilter_engine::DisplayTextError;
use gridfilter_model::error::ModelError;

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// A filter definition failed validation.
    #[error("invalid filter: {0}")]
    Model(#[from] ModelError),

    /// Chip text could not be parsed.
    #[error("cannot parse chip text: {0}")]
    Display(#[from] DisplayTextError),

    /// An input file or argument is unusable.
    #[error("invalid input: {0}")]
    Input(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Settings loaded from the config file.
    pub config: Config,
}

impl CommandContext {
    /// Creates a command context from CLI arguments and the loaded config.
    ///
    /// Colors are off when `--no-color` is given, when `NO_COLOR` is set, or
    /// when the config disables them.
    pub fn new(cli: &Cli, config: Config) -> Self {
        let color_env = std::env::var_os("NO_COLOR").is_none();
        let color_config = config.output.color.unwrap_or(true);
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && color_env && color_config,
            quiet: cli.quiet,
            verbose: cli.verbose,
            config,
        }
    }
}
