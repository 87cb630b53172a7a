//! Configuration handling for the ClickUp CLI
//!
//! Values are layered, lowest precedence first:
//! 1. Built-in defaults
//! 2. Config file: `--config <path>`, or `config.toml` / `config.json` in
//!    the config directory (`~/.config/clickup` on Linux)
//! 3. Environment: `CLICKUP_SPACE_ID`, `CLICKUP_WORKSPACE_ID`,
//!    `CLICKUP_OUTPUT_FORMAT`, `CLICKUP_STRICT_RESOLVE`, `CLICKUP_BASE_URL`
//! 4. Command-line flags

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::OutputFormat;

/// Overrides the config directory (used for both config and credentials)
pub const CONFIG_DIR_ENV: &str = "CLICKUP_CONFIG_DIR";

pub const SPACE_ID_ENV: &str = "CLICKUP_SPACE_ID";
pub const WORKSPACE_ID_ENV: &str = "CLICKUP_WORKSPACE_ID";
pub const OUTPUT_FORMAT_ENV: &str = "CLICKUP_OUTPUT_FORMAT";
pub const STRICT_RESOLVE_ENV: &str = "CLICKUP_STRICT_RESOLVE";
pub const BASE_URL_ENV: &str = "CLICKUP_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Effective configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Space searched when resolving folder and list names
    pub space_id: Option<String>,

    /// Workspace (team) searched when resolving task names
    pub workspace_id: Option<String>,

    /// Output format (unknown values fall back to text)
    pub output_format: OutputFormat,

    /// Fail on ambiguous names instead of taking the first match
    pub strict_resolve: bool,

    /// API base URL (defaults to the public v2 endpoint)
    pub base_url: Option<String>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub space_id: Option<String>,
    pub workspace_id: Option<String>,
    pub output_format: Option<OutputFormat>,
    /// Can only switch strict mode on
    pub strict_resolve: bool,
}

impl Config {
    /// Loads file and environment layers. An explicit path must exist; the
    /// default locations are optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()).into());
                }
                Self::from_file(path)?
            }
            None => match Self::default_path() {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env();
        Ok(config)
    }

    /// Returns the config directory
    pub fn config_dir() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Some(PathBuf::from(dir));
        }
        ProjectDirs::from("", "", "clickup").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// First existing default config file, TOML preferred over legacy JSON
    pub fn default_path() -> Option<PathBuf> {
        let dir = Self::config_dir()?;
        ["config.toml", "config.json"]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Parses a config file; `.json` files are JSON, everything else TOML
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let parsed: Result<Self, ConfigError> = if is_json {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        };

        parsed.with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Applies `CLICKUP_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Applies environment values from `lookup`; empty values are ignored
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(space) = get(SPACE_ID_ENV) {
            self.space_id = Some(space);
        }
        if let Some(workspace) = get(WORKSPACE_ID_ENV) {
            self.workspace_id = Some(workspace);
        }
        if let Some(format) = get(OUTPUT_FORMAT_ENV) {
            self.output_format = OutputFormat::from_name_lenient(&format);
        }
        if let Some(strict) = get(STRICT_RESOLVE_ENV) {
            self.strict_resolve = parse_bool(&strict);
        }
        if let Some(url) = get(BASE_URL_ENV) {
            self.base_url = Some(url);
        }
    }

    /// Applies command-line flags, the highest-precedence layer
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(space) = overrides.space_id.as_ref().filter(|s| !s.is_empty()) {
            self.space_id = Some(space.clone());
        }
        if let Some(workspace) = overrides.workspace_id.as_ref().filter(|s| !s.is_empty()) {
            self.workspace_id = Some(workspace.clone());
        }
        if let Some(format) = overrides.output_format {
            self.output_format = format;
        }
        if overrides.strict_resolve {
            self.strict_resolve = true;
        }
    }

    /// Returns the space ID, or an error explaining how to set one
    pub fn require_space_id(&self) -> Result<&str> {
        self.space_id.as_deref().filter(|s| !s.is_empty()).ok_or_else(|| {
            anyhow::anyhow!(
                "space ID is required: pass --space, set {} or add space_id to the config file",
                SPACE_ID_ENV
            )
        })
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn default_values() {
        let config = Config::default();

        assert_eq!(config.space_id, None);
        assert_eq!(config.output_format, OutputFormat::Text);
        assert!(!config.strict_resolve);
    }

    #[test]
    fn parse_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.toml",
            r#"
space_id = "file_space"
workspace_id = "9001"
output_format = "json"
strict_resolve = true
"#,
        );

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.space_id.as_deref(), Some("file_space"));
        assert_eq!(config.workspace_id.as_deref(), Some("9001"));
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(config.strict_resolve);
    }

    #[test]
    fn parse_legacy_json_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.json",
            r#"{"space_id": "file_space", "output_format": "json", "strict_resolve": true}"#,
        );

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.space_id.as_deref(), Some("file_space"));
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(config.strict_resolve);
    }

    #[test]
    fn unknown_output_format_falls_back_to_text() {
        let config: Config = toml::from_str(r#"output_format = "yaml""#).unwrap();
        assert_eq!(config.output_format, OutputFormat::Text);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.toml", "space_id = [");

        let err = Config::from_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.json",
            r#"{"space_id": "file_space", "output_format": "text"}"#,
        );

        let mut config = Config::from_file(&path).unwrap();
        config.apply_env_with(env(&[
            (SPACE_ID_ENV, "env_space"),
            (OUTPUT_FORMAT_ENV, "json"),
        ]));

        assert_eq!(config.space_id.as_deref(), Some("env_space"));
        assert_eq!(config.output_format, OutputFormat::Json);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = Config {
            space_id: Some("file_space".to_string()),
            ..Default::default()
        };
        config.apply_env_with(env(&[(SPACE_ID_ENV, "")]));

        assert_eq!(config.space_id.as_deref(), Some("file_space"));
    }

    #[test]
    fn strict_resolve_env_accepts_common_spellings() {
        for value in ["1", "true", "TRUE", "yes", "on"] {
            let mut config = Config::default();
            config.apply_env_with(env(&[(STRICT_RESOLVE_ENV, value)]));
            assert!(config.strict_resolve, "{} should enable strict mode", value);
        }

        let mut config = Config {
            strict_resolve: true,
            ..Default::default()
        };
        config.apply_env_with(env(&[(STRICT_RESOLVE_ENV, "false")]));
        assert!(!config.strict_resolve);
    }

    #[test]
    fn cli_overrides_env() {
        let mut config = Config::default();
        config.apply_env_with(env(&[
            (SPACE_ID_ENV, "env_space"),
            (OUTPUT_FORMAT_ENV, "text"),
        ]));
        config.apply_overrides(&Overrides {
            space_id: Some("cli_space".to_string()),
            workspace_id: None,
            output_format: Some(OutputFormat::Json),
            strict_resolve: true,
        });

        assert_eq!(config.space_id.as_deref(), Some("cli_space"));
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(config.strict_resolve);
    }

    #[test]
    fn priority_chain() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.toml",
            r#"
space_id = "file_space"
output_format = "text"
strict_resolve = true
"#,
        );

        let mut config = Config::from_file(&path).unwrap();
        config.apply_env_with(env(&[(SPACE_ID_ENV, "env_space")]));
        config.apply_overrides(&Overrides {
            space_id: Some("cli_space".to_string()),
            ..Default::default()
        });

        assert_eq!(config.space_id.as_deref(), Some("cli_space"));
        // Untouched by env and CLI
        assert_eq!(config.output_format, OutputFormat::Text);
        // --strict absent never turns strict mode off
        assert!(config.strict_resolve);
    }

    #[test]
    fn require_space_id() {
        let config = Config::default();
        assert!(config.require_space_id().is_err());

        let config = Config {
            space_id: Some("42".to_string()),
            ..Default::default()
        };
        assert_eq!(config.require_space_id().unwrap(), "42");
    }
}
