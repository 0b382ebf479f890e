//! Loading a single configuration file into a tree

use crate::error::{ConfigError, ConfigResult};
use crate::template::TemplateMarkers;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, error, trace};

/// Format of a configuration file, decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
    /// Any other allowed extension, loaded as `{ "content": <text> }`
    Text,
}

impl ConfigFormat {
    /// Detect the format from the file name suffix
    pub fn from_path(path: &Path) -> Self {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        if name.ends_with(".yaml") || name.ends_with(".yml") {
            Self::Yaml
        } else if name.ends_with(".json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// A successfully loaded configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFile {
    pub tree: Value,
    pub path: PathBuf,
    pub format: ConfigFormat,
    /// Whether the raw text contained the template open marker
    pub template_markers_found: bool,
}

/// True when the file name ends with one of `extensions`
pub fn is_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// Load `path`, or `None` if it cannot be loaded
///
/// Never fails: disallowed extensions, unreadable files and parse errors all
/// yield `None`, which callers treat the same as a missing file. Read and
/// parse failures are logged at error level.
pub fn load_file(
    path: &Path,
    extensions: &[String],
    markers: &TemplateMarkers,
) -> Option<LoadedFile> {
    match try_load_file(path, extensions, markers) {
        Ok(loaded) => Some(loaded),
        Err(ConfigError::UnsupportedExtension { .. }) => {
            debug!("Not loading {} as its extension is not allowed", path.display());
            None
        }
        Err(e) => {
            error!("Failed to load config file {}: {}", path.display(), e);
            None
        }
    }
}

/// Load `path`, reporting why it could not be loaded
pub fn try_load_file(
    path: &Path,
    extensions: &[String],
    markers: &TemplateMarkers,
) -> ConfigResult<LoadedFile> {
    if !is_allowed_extension(path, extensions) {
        return Err(ConfigError::UnsupportedExtension {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    trace!("Read {} bytes from {}", content.len(), path.display());

    let template_markers_found = markers.contained_in(&content);
    let format = ConfigFormat::from_path(path);
    let tree = parse_content(path, &content, format)?;

    Ok(LoadedFile {
        tree,
        path: path.to_path_buf(),
        format,
        template_markers_found,
    })
}

fn parse_content(path: &Path, content: &str, format: ConfigFormat) -> ConfigResult<Value> {
    match format {
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|source| ConfigError::JsonParse {
                path: path.to_path_buf(),
                source,
            })
        }
        ConfigFormat::Yaml => parse_yaml(path, content),
        ConfigFormat::Text => Ok(json!({ "content": content })),
    }
}

/// Parse YAML with `<<` merge keys applied
fn parse_yaml(path: &Path, content: &str) -> ConfigResult<Value> {
    let yaml_error = |source: serde_yaml_ng::Error| ConfigError::YamlParse {
        path: path.to_path_buf(),
        source,
    };

    let mut document: serde_yaml_ng::Value =
        serde_yaml_ng::from_str(content).map_err(yaml_error)?;
    document.apply_merge().map_err(yaml_error)?;

    serde_json::to_value(document).map_err(|source| ConfigError::YamlConvert {
        path: path.to_path_buf(),
        source,
    })
}
