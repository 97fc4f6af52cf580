//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the gf CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use gridfilter_model::models::ColumnDataType;

/// gf - Filter JSON rows the way a data grid filters its columns
#[derive(Parser, Debug)]
#[command(name = "gf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the distinct values of a column with their counts
    #[command(alias = "v")]
    Values {
        /// JSON file holding an array of rows
        rows: PathBuf,

        /// Binding path of the column (e.g. "address.city")
        #[arg(short, long)]
        column: String,

        /// Group date values by year, month and day
        #[arg(long)]
        by_date: bool,
    },

    /// Apply filter definitions to rows
    #[command(alias = "f")]
    Filter {
        /// JSON file holding an array of rows
        rows: PathBuf,

        /// Filter definition file (.json or .toml)
        #[arg(short, long)]
        definition: PathBuf,

        /// Print only the number of matching rows
        #[arg(long)]
        count: bool,
    },

    /// Show filter chips for a definition file
    Chips {
        /// Filter definition file (.json or .toml)
        #[arg(short, long)]
        definition: PathBuf,

        /// Print the token stream instead of chip text
        #[arg(long)]
        tokens: bool,
    },

    /// Parse chip text back into a search template
    Parse {
        /// Search type name (e.g. "between" or "Is any of")
        search_type: String,

        /// Chip text (e.g. "Between '5' and '10'")
        text: String,

        /// Data type used to convert operands
        #[arg(short = 't', long, value_enum, default_value = "string")]
        data_type: DataTypeArg,
    },

    /// Show how a value selection would be turned into a filter
    #[command(alias = "o")]
    Optimize {
        /// JSON file holding an array of rows
        rows: PathBuf,

        /// Binding path of the column
        #[arg(short, long)]
        column: String,

        /// Selected values, comma separated; "(blank)" selects blanks
        #[arg(short, long, value_delimiter = ',', required = true)]
        select: Vec<String>,
    },

    /// List search types and the data types they apply to
    Types {
        /// Only types that apply to this data type
        #[arg(short = 't', long, value_enum)]
        data_type: Option<DataTypeArg>,

        /// Offer blank checks (only with --data-type)
        #[arg(long, requires = "data_type")]
        nullable: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration (default)
    Show,
    /// Print the config file path
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Column data types accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataTypeArg {
    String,
    Number,
    #[value(alias = "date")]
    DateTime,
    Boolean,
    Enum,
}

impl From<DataTypeArg> for ColumnDataType {
    fn from(arg: DataTypeArg) -> Self {
        match arg {
            DataTypeArg::String => ColumnDataType::String,
            DataTypeArg::Number => ColumnDataType::Number,
            DataTypeArg::DateTime => ColumnDataType::DateTime,
            DataTypeArg::Boolean => ColumnDataType::Boolean,
            DataTypeArg::Enum => ColumnDataType::Enum,
        }
    }
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command() {
        let cli = Cli::parse_from(["gf"]);
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["gf", "types", "--json", "--no-color", "-v"]);
        assert!(cli.json);
        assert!(cli.no_color);
        assert!(cli.verbose);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["gf", "-q", "-v", "types"]).is_err());
    }

    #[test]
    fn test_values_command() {
        let cli = Cli::parse_from(["gf", "values", "rows.json", "--column", "address.city"]);
        if let Some(Commands::Values {
            rows,
            column,
            by_date,
        }) = cli.command
        {
            assert_eq!(rows, PathBuf::from("rows.json"));
            assert_eq!(column, "address.city");
            assert!(!by_date);
        } else {
            panic!("Expected Values command");
        }
    }

    #[test]
    fn test_values_alias() {
        let cli = Cli::parse_from(["gf", "v", "rows.json", "-c", "name"]);
        assert!(matches!(cli.command, Some(Commands::Values { .. })));
    }

    #[test]
    fn test_filter_command() {
        let cli = Cli::parse_from(["gf", "filter", "rows.json", "-d", "filters.toml", "--count"]);
        if let Some(Commands::Filter {
            definition, count, ..
        }) = cli.command
        {
            assert_eq!(definition, PathBuf::from("filters.toml"));
            assert!(count);
        } else {
            panic!("Expected Filter command");
        }
    }

    #[test]
    fn test_optimize_splits_selection() {
        let cli = Cli::parse_from(["gf", "optimize", "rows.json", "-c", "dept", "-s", "a,b,(blank)"]);
        if let Some(Commands::Optimize { select, .. }) = cli.command {
            assert_eq!(select, vec!["a", "b", "(blank)"]);
        } else {
            panic!("Expected Optimize command");
        }
    }

    #[test]
    fn test_optimize_requires_selection() {
        assert!(Cli::try_parse_from(["gf", "optimize", "rows.json", "-c", "dept"]).is_err());
    }

    #[test]
    fn test_types_data_type() {
        let cli = Cli::parse_from(["gf", "types", "-t", "date", "--nullable"]);
        if let Some(Commands::Types {
            data_type,
            nullable,
        }) = cli.command
        {
            assert_eq!(data_type, Some(DataTypeArg::DateTime));
            assert!(nullable);
        } else {
            panic!("Expected Types command");
        }
    }

    #[test]
    fn test_nullable_requires_data_type() {
        assert!(Cli::try_parse_from(["gf", "types", "--nullable"]).is_err());
    }

    #[test]
    fn test_parse_command() {
        let cli = Cli::parse_from(["gf", "parse", "between", "Between '5' and '10'", "-t", "number"]);
        if let Some(Commands::Parse {
            search_type,
            text,
            data_type,
        }) = cli.command
        {
            assert_eq!(search_type, "between");
            assert_eq!(text, "Between '5' and '10'");
            assert_eq!(ColumnDataType::from(data_type), ColumnDataType::Number);
        } else {
            panic!("Expected Parse command");
        }
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["gf", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                command: Some(ConfigCommands::Init { force: true })
            })
        ));
    }

    #[test]
    fn test_completions() {
        let cli = Cli::parse_from(["gf", "completions", "zsh"]);
        if let Some(Commands::Completions { shell }) = cli.command {
            assert!(matches!(shell, Shell::Zsh));
        } else {
            panic!("Expected Completions command");
        }
    }
}
