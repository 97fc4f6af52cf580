//! Command dispatch module for routing CLI commands to their handlers.

use crate::cli::{Commands, ConfigCommands};
use crate::commands::{self, CommandContext, CommandError, Result};

/// Routes a parsed command to its handler.
pub fn dispatch(ctx: &CommandContext, command: Option<&Commands>) -> Result<()> {
    let Some(command) = command else {
        if !ctx.quiet {
            println!("gf - grid filter CLI");
            println!("Use --help for usage information");
        }
        return Ok(());
    };

    match command {
        Commands::Values {
            rows,
            column,
            by_date,
        } => {
            let opts = commands::values::ValuesOptions {
                rows: rows.clone(),
                column: column.clone(),
                by_date: *by_date,
            };
            commands::values::execute(ctx, &opts)
        }
        Commands::Filter {
            rows,
            definition,
            count,
        } => {
            let opts = commands::filter::FilterOptions {
                rows: rows.clone(),
                definition: definition.clone(),
                count: *count,
            };
            commands::filter::execute(ctx, &opts)
        }
        Commands::Chips { definition, tokens } => {
            let opts = commands::chips::ChipsOptions {
                definition: definition.clone(),
                tokens: *tokens,
            };
            commands::chips::execute(ctx, &opts)
        }
        Commands::Parse {
            search_type,
            text,
            data_type,
        } => {
            let opts = commands::parse::ParseOptions {
                search_type: search_type.clone(),
                text: text.clone(),
                data_type: (*data_type).into(),
            };
            commands::parse::execute(ctx, &opts)
        }
        Commands::Optimize {
            rows,
            column,
            select,
        } => {
            let opts = commands::optimize::OptimizeOptions {
                rows: rows.clone(),
                column: column.clone(),
                select: select.clone(),
            };
            commands::optimize::execute(ctx, &opts)
        }
        Commands::Types {
            data_type,
            nullable,
        } => {
            let opts = commands::types::TypesOptions {
                data_type: data_type.map(Into::into),
                nullable: *nullable,
            };
            commands::types::execute(ctx, &opts)
        }
        Commands::Config { command } => dispatch_config(ctx, command.as_ref()),
        Commands::Completions { shell } => {
            commands::completions::execute(shell).map_err(CommandError::Io)
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: Option<&ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
        Some(ConfigCommands::Init { force }) => commands::config::execute_init(ctx, *force),
    }
}
