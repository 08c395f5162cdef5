//! # Configuration
//!
//! Every setting is layered; later layers win:
//!
//! ```text
//! built-in defaults → ~/.charla/config.toml → CHARLA_* env → CLI flags
//! ```
//!
//! On first run a fully commented template is written to the config path,
//! listing each key with its default.

use log::{debug, info, warn};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::PayloadField;

// ============================================================================
// File Layout (every key optional)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CharlaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub welcome: WelcomeConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeneralConfig {
    pub endpoint: Option<String>,
    pub payload_field: Option<PayloadField>,
    pub markdown: Option<bool>,
    pub max_input_lines: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WelcomeConfig {
    pub suggestions: Option<Vec<String>>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/chat";
pub const DEFAULT_MAX_INPUT_LINES: u16 = 8;
/// Suggestions beyond this are ignored (one per Alt+digit shortcut).
pub const MAX_SUGGESTIONS: usize = 9;

fn default_suggestions() -> Vec<String> {
    [
        "Explain how HTTP caching works",
        "Write a haiku about the sea",
        "Give me three tips for a productive morning",
        "Summarize the plot of Don Quixote",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// ============================================================================
// Effective Settings
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub payload_field: PayloadField,
    pub markdown: bool,
    pub max_input_lines: u16,
    pub suggestions: Vec<String>,
}

/// Values taken from CLI flags. `None` = not specified.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub payload_field: Option<PayloadField>,
    pub no_markdown: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.charla/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".charla").join("config.toml"))
}

/// Load config from `~/.charla/config.toml`.
///
/// A missing file is not an error: the template is written and the
/// empty config returned.
pub fn load_config() -> Result<CharlaConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(CharlaConfig::default());
    };

    if !path.exists() {
        info!("Writing config template to {}", path.display());
        generate_default_config(&path);
        return Ok(CharlaConfig::default());
    }

    load_config_from(&path)
}

/// Load and parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<CharlaConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: CharlaConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Config read from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Charla Configuration
# All settings are optional. Defaults are used for anything not specified.
# Precedence: built-in defaults, then this file, then CHARLA_* env, then CLI flags.

# [general]
# endpoint = "http://localhost:5000/chat"   # Or set CHARLA_ENDPOINT
# payload_field = "message"                 # "message" or "mensaje" (legacy backends)
# markdown = true                           # Render bot replies as markdown
# max_input_lines = 8                       # Input box grows up to this many lines

# [welcome]
# suggestions = [
#     "Explain how HTTP caching works",
#     "Write a haiku about the sea",
# ]
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Could not write config template: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Collapse every layer into concrete values, reading the process environment.
pub fn resolve(config: &CharlaConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with the environment supplied by `env`.
pub fn resolve_with<F>(config: &CharlaConfig, cli: &CliOverrides, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Endpoint: CLI → env → config → default
    let endpoint = cli
        .endpoint
        .clone()
        .or_else(|| env("CHARLA_ENDPOINT"))
        .or_else(|| config.general.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    // Payload field: CLI → env → config → default
    let payload_field = cli
        .payload_field
        .or_else(|| {
            env("CHARLA_PAYLOAD_FIELD").and_then(|v| match PayloadField::parse(&v) {
                    Some(field) => Some(field),
                    None => {
                        warn!("Ignoring unknown CHARLA_PAYLOAD_FIELD value: {}", v);
                        None
                    }
                })
        })
        .or(config.general.payload_field)
        .unwrap_or_default();

    // --no-markdown can only switch it off
    let markdown = !cli.no_markdown && config.general.markdown.unwrap_or(true);

    let max_input_lines = config
        .general
        .max_input_lines
        .unwrap_or(DEFAULT_MAX_INPUT_LINES)
        .max(1);

    let mut suggestions = config
        .welcome
        .suggestions
        .clone()
        .unwrap_or_else(default_suggestions);
    suggestions.retain(|s| !s.trim().is_empty());
    suggestions.truncate(MAX_SUGGESTIONS);

    ResolvedConfig {
        endpoint,
        payload_field,
        markdown,
        max_input_lines,
        suggestions,
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve_with(&CharlaConfig::default(), &CliOverrides::default(), |_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = CharlaConfig::default();
        assert!(config.general.endpoint.is_none());
        assert!(config.welcome.suggestions.is_none());
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with(&CharlaConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(resolved.payload_field, PayloadField::Message);
        assert_eq!(resolved.max_input_lines, DEFAULT_MAX_INPUT_LINES);
        assert!(resolved.markdown);
        assert_eq!(resolved.suggestions, default_suggestions());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = CharlaConfig {
            general: GeneralConfig {
                endpoint: Some("http://example.test/chat".to_string()),
                payload_field: Some(PayloadField::Mensaje),
                markdown: Some(false),
                max_input_lines: Some(3),
            },
            welcome: WelcomeConfig {
                suggestions: Some(vec!["one".to_string(), "  ".to_string()]),
            },
        };
        let resolved = resolve_with(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.payload_field, PayloadField::Mensaje);
        assert!(!resolved.markdown);
        assert_eq!(resolved.max_input_lines, 3);
        assert_eq!(resolved.suggestions, vec!["one".to_string()]);
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = CharlaConfig {
            general: GeneralConfig {
                endpoint: Some("http://from-file/chat".to_string()),
                payload_field: Some(PayloadField::Mensaje),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            endpoint: Some("http://from-cli/chat".to_string()),
            payload_field: Some(PayloadField::Message),
            no_markdown: true,
        };
        let resolved = resolve_with(&config, &cli, no_env);
        assert_eq!(resolved.endpoint, "http://from-cli/chat");
        assert_eq!(resolved.payload_field, PayloadField::Message);
        assert!(!resolved.markdown);
    }

    #[test]
    fn test_zero_input_lines_clamped_to_one() {
        let config = CharlaConfig {
            general: GeneralConfig {
                max_input_lines: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            resolve_with(&config, &CliOverrides::default(), no_env).max_input_lines,
            1
        );
    }

    #[test]
    fn test_suggestions_capped() {
        let config = CharlaConfig {
            welcome: WelcomeConfig {
                suggestions: Some((0..20).map(|i| format!("s{i}")).collect()),
            },
            ..Default::default()
        };
        let resolved = resolve_with(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.suggestions.len(), MAX_SUGGESTIONS);
    }

    fn file_config() -> CharlaConfig {
        CharlaConfig {
            general: GeneralConfig {
                endpoint: Some("http://from-file/chat".to_string()),
                payload_field: Some(PayloadField::Mensaje),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_env_overrides_file() {
        let env = env_of(&[
            ("CHARLA_ENDPOINT", "http://from-env/chat"),
            ("CHARLA_PAYLOAD_FIELD", "message"),
        ]);
        let resolved = resolve_with(&file_config(), &CliOverrides::default(), env);
        assert_eq!(resolved.endpoint, "http://from-env/chat");
        assert_eq!(resolved.payload_field, PayloadField::Message);
    }

    #[test]
    fn test_cli_overrides_env() {
        let env = env_of(&[
            ("CHARLA_ENDPOINT", "http://from-env/chat"),
            ("CHARLA_PAYLOAD_FIELD", "message"),
        ]);
        let cli = CliOverrides {
            endpoint: Some("http://from-cli/chat".to_string()),
            payload_field: Some(PayloadField::Mensaje),
            no_markdown: false,
        };
        let resolved = resolve_with(&file_config(), &cli, env);
        assert_eq!(resolved.endpoint, "http://from-cli/chat");
        assert_eq!(resolved.payload_field, PayloadField::Mensaje);
    }

    #[test]
    fn test_unknown_env_payload_field_falls_through_to_file() {
        let env = env_of(&[("CHARLA_PAYLOAD_FIELD", "body")]);
        let resolved = resolve_with(&file_config(), &CliOverrides::default(), env);
        assert_eq!(resolved.payload_field, PayloadField::Mensaje);
        assert_eq!(resolved.endpoint, "http://from-file/chat");
    }

    #[test]
    fn test_toml_parses_all_sections() {
        let toml_str = r#"
[general]
endpoint = "http://127.0.0.1:8000/preguntar"
payload_field = "mensaje"
markdown = false
max_input_lines = 4

[welcome]
suggestions = ["Hola", "¿Qué tal?"]
"#;
        let config: CharlaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.general.endpoint.as_deref(),
            Some("http://127.0.0.1:8000/preguntar")
        );
        assert_eq!(config.general.payload_field, Some(PayloadField::Mensaje));
        assert_eq!(config.general.markdown, Some(false));
        assert_eq!(config.welcome.suggestions.unwrap().len(), 2);
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[general]
markdown = false
"#;
        let config: CharlaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.markdown, Some(false));
        assert!(config.general.endpoint.is_none());
        assert!(config.welcome.suggestions.is_none());
    }

    #[test]
    fn test_unknown_payload_field_is_parse_error() {
        let toml_str = r#"
[general]
payload_field = "texto"
"#;
        assert!(toml::from_str::<CharlaConfig>(toml_str).is_err());
    }
}
