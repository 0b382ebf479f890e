//! Error types for the configuration loading stages
//!
//! These errors describe why a single candidate file or template pass failed.
//! They are logged and swallowed at the stage boundary: a file that cannot be
//! loaded is treated exactly like a file that does not exist, and a template
//! pass that cannot be completed leaves the tree unexpanded.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration loading stages
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File extension is not on the allow-list
    #[error("Unsupported configuration file extension: {path}")]
    UnsupportedExtension { path: PathBuf },

    /// Failed to read configuration file
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON configuration file could not be parsed
    #[error("Failed to parse JSON configuration {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// YAML configuration file could not be parsed
    #[error("Failed to parse YAML configuration {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },

    /// YAML document holds values with no JSON counterpart
    #[error("Failed to convert YAML configuration {path}: {source}")]
    YamlConvert {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Placeholder pattern could not be built from the template markers
    #[error("Invalid template markers {open:?} / {close:?}: {source}")]
    TemplatePattern {
        open: String,
        close: String,
        source: regex::Error,
    },

    /// Tree could not be serialized for template expansion
    #[error("Failed to serialize configuration for template expansion: {source}")]
    TemplateSerialize { source: serde_json::Error },

    /// Expanded template text is no longer a valid tree
    #[error("Failed to parse configuration after template expansion: {source}")]
    TemplateDeserialize { source: serde_json::Error },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::UnsupportedExtension {
            path: PathBuf::from("/etc/local/config.toml"),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported configuration file extension: /etc/local/config.toml"
        );
    }

    #[test]
    fn test_parse_error_mentions_path() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ConfigError::JsonParse {
            path: PathBuf::from("etc/bad.json"),
            source,
        };
        assert!(err.to_string().contains("etc/bad.json"));
        assert!(err.to_string().starts_with("Failed to parse JSON configuration"));
    }
}
