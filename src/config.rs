//! Service configuration
//!
//! Loaded from a TOML document. Every section is optional; anything left
//! out takes the value from [`DEFAULT_CONFIG`].

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::identity::TokenEntry;
use crate::interaction::EditorSettings;

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Built-in configuration
pub const DEFAULT_CONFIG: &str = r##"
[server]
addr = "127.0.0.1:8080"
database_url = "sqlite://layout-studio.db"

[editor]
snap_threshold = 1.5
nudge_step = 0.5
nudge_coarse_step = 5.0
canvas = { width = 1200.0, height = 800.0 }
template_preview = { width = 360.0, height = 540.0 }

# [[auth.tokens]]
# token = "change-me"
# actor_id = "owner"
# admin = true
"##;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
    pub database_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
            database_url: "sqlite://layout-studio.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub tokens: Vec<TokenEntry>,
}

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub server: ServerConfig,
    pub editor: EditorSettings,
    pub auth: AuthConfig,
}

impl StudioConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from TOML
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: StudioConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The built-in configuration
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_str(DEFAULT_CONFIG)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let editor = &self.editor;
        if editor.snap_threshold.is_nan() || editor.snap_threshold < 0.0 {
            return Err(ConfigError::Invalid(
                "editor.snap_threshold must not be negative".into(),
            ));
        }
        if !is_positive(editor.nudge_step) || !is_positive(editor.nudge_coarse_step) {
            return Err(ConfigError::Invalid("editor nudge steps must be positive".into()));
        }
        for (name, size) in [
            ("canvas", editor.canvas),
            ("template_preview", editor.template_preview),
        ] {
            if !is_positive(size.width) || !is_positive(size.height) {
                return Err(ConfigError::Invalid(format!(
                    "editor.{} must have a positive size",
                    name
                )));
            }
        }
        if self.auth.tokens.iter().any(|t| t.token.trim().is_empty()) {
            return Err(ConfigError::Invalid("auth tokens must not be empty".into()));
        }
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::Size;
    use std::io::Write;

    #[test]
    fn test_builtin_config_parses() {
        let config = StudioConfig::builtin().expect("Built-in config should be valid TOML");
        assert_eq!(config, StudioConfig::default());
        assert!(config.auth.tokens.is_empty());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = StudioConfig::from_str(
            r#"
[editor]
snap_threshold = 3.0
"#,
        )
        .expect("Should parse");
        assert_eq!(config.editor.snap_threshold, 3.0);
        assert_eq!(config.editor.nudge_step, 0.5);
        assert_eq!(config.server.addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_tokens_section() {
        let config = StudioConfig::from_str(
            r#"
[[auth.tokens]]
token = "abc"
actor_id = "owner"
admin = true

[[auth.tokens]]
token = "def"
actor_id = "guest"
"#,
        )
        .expect("Should parse");
        assert_eq!(config.auth.tokens.len(), 2);
        assert!(config.auth.tokens[0].admin);
        assert!(!config.auth.tokens[1].admin);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = StudioConfig::from_str("[editor]\nnudge_step = 0.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = StudioConfig::from_str("[editor]\ncanvas = { width = 0.0, height = 10.0 }\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let result = StudioConfig::from_str("[server\naddr = 1");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\naddr = \"0.0.0.0:9000\"\n\n[editor]\ncanvas = {{ width = 800.0, height = 600.0 }}"
        )
        .unwrap();
        let config = StudioConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.addr, "0.0.0.0:9000");
        assert_eq!(config.editor.canvas, Size::new(800.0, 600.0));
    }
}
