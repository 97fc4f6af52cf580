use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::{Cli, Commands};
use commands::config::{load_config, Config};
use commands::{CommandContext, CommandError};

/// Environment variable holding a tracing filter directive.
const ENV_LOG: &str = "GF_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("{error_json}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

fn run(cli: &Cli) -> commands::Result<()> {
    let config = match load_config() {
        Ok(config) => config,
        // A broken config file must not block the commands that repair it.
        Err(e) if matches!(cli.command, Some(Commands::Config { .. })) => {
            tracing::warn!(error = %e, "ignoring unreadable config");
            Config::default()
        }
        Err(e) => return Err(e),
    };

    let ctx = CommandContext::new(cli, config);
    tracing::debug!(command = ?cli.command, "dispatching");
    dispatch::dispatch(&ctx, cli.command.as_ref())
}

/// Installs the stderr log subscriber.
///
/// `GF_LOG` wins over the verbosity flags.
fn init_logging(cli: &Cli) {
    let filter = std::env::var(ENV_LOG).unwrap_or_else(|_| default_filter(cli).to_string());

    tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(!cli.no_color && std::env::var_os("NO_COLOR").is_none())
        .with_writer(std::io::stderr)
        .compact()
        .with_env_filter(filter)
        .init();
}

fn default_filter(cli: &Cli) -> &'static str {
    if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Model(_) => "MODEL_ERROR",
        CommandError::Display(_) => "DISPLAY_ERROR",
        CommandError::Input(_) => "INPUT_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
        CommandError::Toml(_) => "TOML_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(exit_status(e))
}

fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Model(_) | CommandError::Display(_) => 1,
        CommandError::Io(_) => 3,
        CommandError::Input(_) | CommandError::Json(_) | CommandError::Toml(_) => 4,
        CommandError::Config(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfilter_model::error::ModelError;
    use gridfilter_model::models::SearchType;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("gf").chain(args.iter().copied()))
    }

    #[test]
    fn test_default_filter_follows_flags() {
        assert_eq!(default_filter(&cli(&["types"])), "warn");
        assert_eq!(default_filter(&cli(&["-v", "types"])), "debug");
        assert_eq!(default_filter(&cli(&["-q", "types"])), "error");
    }

    #[test]
    fn test_error_codes() {
        let input = CommandError::Input("bad".into());
        assert_eq!(error_code(&input), "INPUT_ERROR");
        assert_eq!(exit_status(&input), 4);

        let config = CommandError::Config("bad".into());
        assert_eq!(error_code(&config), "CONFIG_ERROR");
        assert_eq!(exit_status(&config), 5);

        let io = CommandError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(error_code(&io), "IO_ERROR");
        assert_eq!(exit_status(&io), 3);
    }

    #[test]
    fn test_filter_errors_exit_with_one() {
        let err = CommandError::from(ModelError::validation(SearchType::Between, "no operand"));
        assert_eq!(error_code(&err), "MODEL_ERROR");
        assert_eq!(exit_status(&err), 1);
    }
}
