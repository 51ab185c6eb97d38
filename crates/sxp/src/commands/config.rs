//! Config command implementation.
//!
//! View and create configuration settings.
//! Config file is located at ~/.config/sxp/config.toml.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};
use crate::matcher::{MatchMode, MatchOptions};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# sxp - search expression playground configuration

# Config schema version (do not modify)
version = 1

# Output preferences
[output]
# color = true                # Enable colors (respects NO_COLOR env)

# Defaults for `sxp filter`
[filter]
# mode = "exact"              # "exact" or "contains"
# case_sensitive = false
# allow_bare_values = true    # Allow terms without a key, matched against every field
"#;

/// Configuration file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Filter settings.
    #[serde(default)]
    pub filter: FilterConfig,
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
            filter: FilterConfig::default(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Filter configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// How values are compared with record fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<MatchMode>,

    /// Compare case-sensitively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,

    /// Allow bare values (terms without a key).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_bare_values: Option<bool>,
}

impl FilterConfig {
    /// Resolves matching options; command-line values take precedence.
    pub fn match_options(&self, mode: Option<MatchMode>, case_sensitive: Option<bool>) -> MatchOptions {
        let defaults = MatchOptions::default();
        MatchOptions {
            mode: mode.or(self.mode).unwrap_or(defaults.mode),
            case_sensitive: case_sensitive
                .or(self.case_sensitive)
                .unwrap_or(defaults.case_sensitive),
            allow_bare_values: self
                .allow_bare_values
                .unwrap_or(defaults.allow_bare_values),
        }
    }
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/sxp/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    // Use XDG_CONFIG_HOME if set, otherwise ~/.config/sxp
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("sxp"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("sxp"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
///
/// An explicit path (from `--config` or `SXP_CONFIG`) wins over the default
/// location.
pub fn get_config_path(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config(override_path: Option<&Path>) -> Result<Config> {
    let path = get_config_path(override_path)?;
    load_config_from(&path)
}

/// Loads the configuration from `path`, or the defaults if it does not exist.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    tracing::debug!(path = %path.display(), "loaded config");
    migrate_config(config)
}

/// Migrates config to current version if needed.
/// Returns the config as-is if already at current version.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "Config version {} is newer than supported version {}",
            config.version, CONFIG_VERSION
        )));
    }

    // Version 1 is the initial schema; nothing to migrate yet
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext, config: &Config, path: &Path) -> Result<()> {
    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        let options = config.filter.match_options(None, None);
        println!("[output]");
        println!("  color: {}", config.output.color.unwrap_or(true));
        println!("\n[filter]");
        println!("  mode: {}", format_mode(options.mode));
        println!("  case_sensitive: {}", options.case_sensitive);
        println!("  allow_bare_values: {}", options.allow_bare_values);

        if !path.exists() {
            println!("\n(No config file exists. Run 'sxp config init' to create one.)");
        }
    }

    Ok(())
}

fn format_mode(mode: MatchMode) -> &'static str {
    match mode {
        MatchMode::Exact => "exact",
        MatchMode::Contains => "contains",
    }
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext, path: &Path) -> Result<()> {
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

/// Executes the config init command, writing the default config file.
pub fn execute_init(ctx: &CommandContext, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    // Ensure directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CommandError::Config(format!("Failed to create config directory: {}", e)))?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Created default config at: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn quiet_ctx() -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
        }
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_default_config_file_parses_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[output]
color = false

[filter]
mode = "contains"
allow_bare_values = false
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.output.color, Some(false));
        assert_eq!(config.filter.mode, Some(MatchMode::Contains));
        assert_eq!(config.filter.case_sensitive, None);
        assert_eq!(config.filter.allow_bare_values, Some(false));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[filter]\nmode = \"fuzzy\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, CommandError::Config(ref msg) if msg.starts_with("Failed to parse config")));
    }

    #[test]
    fn test_newer_config_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "version = 99\n").unwrap();

        assert!(matches!(load_config_from(&path), Err(CommandError::Config(_))));
    }

    #[test]
    fn test_match_options_precedence() {
        let filter = FilterConfig {
            mode: Some(MatchMode::Contains),
            case_sensitive: Some(true),
            allow_bare_values: None,
        };

        let options = filter.match_options(None, None);
        assert_eq!(options.mode, MatchMode::Contains);
        assert!(options.case_sensitive);
        assert!(options.allow_bare_values);

        let options = filter.match_options(Some(MatchMode::Exact), Some(false));
        assert_eq!(options.mode, MatchMode::Exact);
        assert!(!options.case_sensitive);
    }

    #[test]
    fn test_init_writes_default_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        execute_init(&quiet_ctx(), &path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        // A second init without --force refuses to overwrite
        assert!(execute_init(&quiet_ctx(), &path, false).is_err());
        execute_init(&quiet_ctx(), &path, true).unwrap();
    }

    #[test]
    fn test_override_path_wins() {
        let path = Path::new("/tmp/custom-sxp.toml");
        assert_eq!(get_config_path(Some(path)).unwrap(), path);
    }

    #[test]
    #[serial]
    fn test_xdg_config_home() {
        let dir = TempDir::new().unwrap();
        let previous = env::var_os("XDG_CONFIG_HOME");
        env::set_var("XDG_CONFIG_HOME", dir.path());

        let path = get_config_path(None).unwrap();

        match previous {
            Some(value) => env::set_var("XDG_CONFIG_HOME", value),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }
        assert_eq!(path, dir.path().join("sxp").join("config.toml"));
    }
}
