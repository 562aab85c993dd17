//! Configuration for lcm-core
//!
//! Default writing systems, undo history behaviour and text defaults used by
//! the property accessor.

use serde::{Deserialize, Serialize};

/// Accessor-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessorConfig {
    /// Default writing systems
    #[serde(default)]
    pub writing_systems: WritingSystemConfig,
    /// Undo/redo behaviour
    #[serde(default)]
    pub undo: UndoConfig,
    /// Paragraph defaults
    #[serde(default)]
    pub text: TextConfig,
}

/// Writing system identifiers used for string defaulting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingSystemConfig {
    /// Default analysis writing system (glosses, definitions)
    pub analysis: String,
    /// Default vernacular writing system (lexeme forms, texts)
    pub vernacular: String,
    /// Fallback for fields that declare no role
    pub user: String,
}

impl Default for WritingSystemConfig {
    fn default() -> Self {
        Self {
            analysis: "en".to_string(),
            vernacular: "fr".to_string(),
            user: "en".to_string(),
        }
    }
}

/// Undo stack configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoConfig {
    /// Reject mutations issued outside an undo or non-undoable task
    pub require_task: bool,
    /// Number of undoable tasks kept; the oldest are dropped first
    pub max_depth: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            require_task: true,
            max_depth: 100,
        }
    }
}

/// Text configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextConfig {
    /// Style given to the first paragraph of a text
    pub default_paragraph_style: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            default_paragraph_style: "Normal".to_string(),
        }
    }
}

impl AccessorConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ws = &self.writing_systems;
        for (name, value) in [
            ("writing_systems.analysis", &ws.analysis),
            ("writing_systems.vernacular", &ws.vernacular),
            ("writing_systems.user", &ws.user),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(name.to_string()));
            }
        }

        if self.undo.max_depth == 0 {
            return Err(ConfigError::OutOfRange(
                "undo.max_depth must be positive".to_string(),
            ));
        }

        if self.text.default_paragraph_style.trim().is_empty() {
            return Err(ConfigError::MissingField(
                "text.default_paragraph_style".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Value is out of valid range
    OutOfRange(String),
    /// Required field is missing or blank
    MissingField(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::OutOfRange(msg) => write!(f, "Value out of range: {}", msg),
            ConfigError::MissingField(msg) => write!(f, "Missing field: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AccessorConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.undo.require_task);
    }

    #[test]
    fn test_json_serialization() {
        let config = AccessorConfig::default();
        let json = config.to_json().unwrap();
        let parsed = AccessorConfig::from_json(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_toml_partial_document() {
        let config = AccessorConfig::from_toml(
            r#"
[writing_systems]
analysis = "en"
vernacular = "seh"
user = "pt"

[undo]
require_task = false
max_depth = 5
"#,
        )
        .unwrap();
        assert_eq!(config.writing_systems.vernacular, "seh");
        assert_eq!(config.undo.max_depth, 5);
        assert_eq!(config.text.default_paragraph_style, "Normal");

        let round = AccessorConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, round);
    }

    #[test]
    fn test_blank_writing_system() {
        let mut config = AccessorConfig::default();
        config.writing_systems.vernacular = " ".into();
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingField("writing_systems.vernacular".into()))
        );
    }

    #[test]
    fn test_zero_undo_depth() {
        let mut config = AccessorConfig::default();
        config.undo.max_depth = 0;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));
    }
}
