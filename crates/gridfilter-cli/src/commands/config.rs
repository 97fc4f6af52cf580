//! Config command implementation.
//!
//! View and initialize configuration settings.
//! Config file is located at ~/.config/gf/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use gridfilter_engine::metadata::BlankPolicy;
use gridfilter_engine::optimizer::{FilterSelectionOptimizer, DEFAULT_MIN_DATASET_SIZE};
use gridfilter_engine::value_cache::{CacheOptions, DEFAULT_SORT_CEILING};
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# gf - grid filter CLI configuration

# Config schema version (do not modify)
version = 1

# Output preferences
[output]
# color = true                # Enable colors (respects NO_COLOR env)

# Value cache settings
[cache]
# sort_ceiling = 100000       # Columns with more distinct values stay unsorted
# blank_policy = "distinct"   # "distinct" or "equivalent"

# Selection optimizer settings
[optimizer]
# enabled = true
# min_dataset_size = 10       # Smaller columns always list the selection
"#;

/// Configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Value cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Selection optimizer settings.
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            output: OutputConfig::default(),
            cache: CacheConfig::default(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl Config {
    /// Cache options with unset fields at their defaults.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            sort_ceiling: self.cache.sort_ceiling.unwrap_or(DEFAULT_SORT_CEILING),
        }
    }

    /// How blanks are listed by `gf values`.
    pub fn blank_policy(&self) -> BlankPolicy {
        self.cache.blank_policy.unwrap_or_default()
    }

    /// Optimizer with unset fields at their defaults.
    pub fn optimizer(&self) -> FilterSelectionOptimizer {
        FilterSelectionOptimizer {
            enabled: self.optimizer.enabled.unwrap_or(true),
            min_dataset_size: self
                .optimizer
                .min_dataset_size
                .unwrap_or(DEFAULT_MIN_DATASET_SIZE),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Value cache configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Distinct values beyond this count are left unsorted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_ceiling: Option<usize>,

    /// Whether null, empty and whitespace values are listed separately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blank_policy: Option<BlankPolicy>,
}

/// Selection optimizer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Allow exclusion filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Columns with fewer distinct values always list the selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_dataset_size: Option<usize>,
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/gf/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(path) = env::var("GF_CONFIG") {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            return Ok(parent.to_path_buf());
        }
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("gf"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("gf"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("GF_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        tracing::warn!(
            version = config.version,
            supported = CONFIG_VERSION,
            "config file is newer than this gf"
        );
    }
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = &ctx.config;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
            "effective": {
                "cache": config.cache_options(),
                "blank_policy": config.blank_policy(),
                "optimizer": {
                    "enabled": config.optimizer().enabled,
                    "min_dataset_size": config.optimizer().min_dataset_size,
                },
            },
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        let optimizer = config.optimizer();
        println!("[output]");
        println!("  color: {}", config.output.color.unwrap_or(true));
        println!("\n[cache]");
        println!("  sort_ceiling: {}", config.cache_options().sort_ceiling);
        println!("  blank_policy: {}", blank_policy_name(config.blank_policy()));
        println!("\n[optimizer]");
        println!("  enabled: {}", optimizer.enabled);
        println!("  min_dataset_size: {}", optimizer.min_dataset_size);

        if !path.exists() {
            println!("\n(No config file exists. Run 'gf config init' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Executes the config init command.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path()?;

    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CommandError::Config(format!("Failed to create config directory: {}", e)))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn blank_policy_name(policy: BlankPolicy) -> &'static str {
    match policy {
        BlankPolicy::Distinct => "distinct",
        BlankPolicy::Equivalent => "equivalent",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.output.color.is_none());
        assert!(config.cache.sort_ceiling.is_none());
        assert_eq!(config.cache_options(), CacheOptions::default());
        assert_eq!(config.blank_policy(), BlankPolicy::Distinct);
        assert!(config.optimizer().enabled);
        assert_eq!(config.optimizer().min_dataset_size, DEFAULT_MIN_DATASET_SIZE);
    }

    #[test]
    fn test_default_config_file_parses_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.cache_options(), CacheOptions::default());
        assert!(config.optimizer.enabled.is_none());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
version = 1

[output]
color = false

[cache]
sort_ceiling = 500
blank_policy = "equivalent"

[optimizer]
enabled = false
min_dataset_size = 3
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.color, Some(false));
        assert_eq!(config.cache_options().sort_ceiling, 500);
        assert_eq!(config.blank_policy(), BlankPolicy::Equivalent);
        assert!(!config.optimizer().enabled);
        assert_eq!(config.optimizer().min_dataset_size, 3);
    }

    #[test]
    fn test_config_deserialization_rejects_unknown_policy() {
        let toml_str = r#"
[cache]
blank_policy = "sometimes"
"#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.output.color = Some(true);
        config.cache.blank_policy = Some(BlankPolicy::Equivalent);

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("color = true"));
        assert!(toml_str.contains("blank_policy = \"equivalent\""));
        assert!(!toml_str.contains("sort_ceiling"));
    }

    #[test]
    fn test_migrate_config_sets_current_version() {
        let config = Config {
            version: 999,
            ..Config::default()
        };
        assert_eq!(migrate_config(config).unwrap().version, CONFIG_VERSION);
    }

    #[test]
    #[serial]
    fn test_load_config_from_env_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[optimizer]\nmin_dataset_size = 4\n").unwrap();

        let original = env::var("GF_CONFIG").ok();
        env::set_var("GF_CONFIG", &config_path);

        let path = get_config_path();
        let config = load_config();

        match original {
            Some(val) => env::set_var("GF_CONFIG", val),
            None => env::remove_var("GF_CONFIG"),
        }

        assert_eq!(path.unwrap(), config_path);
        assert_eq!(config.unwrap().optimizer().min_dataset_size, 4);
    }

    #[test]
    #[serial]
    fn test_load_config_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("missing.toml");

        let original = env::var("GF_CONFIG").ok();
        env::set_var("GF_CONFIG", &config_path);
        let config = load_config();
        match original {
            Some(val) => env::set_var("GF_CONFIG", val),
            None => env::remove_var("GF_CONFIG"),
        }

        assert_eq!(config.unwrap().version, CONFIG_VERSION);
    }

    #[test]
    #[serial]
    fn test_load_config_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[cache\n").unwrap();

        let original = env::var("GF_CONFIG").ok();
        env::set_var("GF_CONFIG", &config_path);
        let config = load_config();
        match original {
            Some(val) => env::set_var("GF_CONFIG", val),
            None => env::remove_var("GF_CONFIG"),
        }

        assert!(matches!(config, Err(CommandError::Config(_))));
    }
}
