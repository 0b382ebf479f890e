//! Options controlling how a [`ConfigStore`](crate::ConfigStore) is loaded

use crate::discovery::DEFAULT_EXTENSIONS;
use crate::template::TemplateMarkers;
use light_config_entity::ValidationOptions;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

/// Options for loading configuration
///
/// Everything defaults to the conventional layout: the environment comes
/// from `FP8_ENV` (or `local`), files are searched relative to the current
/// directory and the process environment is used for `ENV` templating.
#[derive(Debug, Clone)]
pub struct ConfigStoreOptions {
    /// Environment segment, overriding `FP8_ENV`
    pub env: Option<String>,
    /// Exact file name to search for instead of the default base names
    pub config_file_name: Option<String>,
    /// Also load the other files in the directory of the primary file
    pub load_all: bool,
    /// Entries merged under the loaded data; loaded keys win
    pub entries: Option<Map<String, Value>>,
    /// Placeholder delimiters
    pub markers: TemplateMarkers,
    pub validation: ValidationOptions,
    /// Directory candidate paths are resolved against
    pub base_dir: Option<PathBuf>,
    /// Environment variables, a snapshot of the process environment if unset
    pub env_vars: Option<BTreeMap<String, String>>,
    /// File extensions that may be loaded, including the leading dot
    pub extensions: Vec<String>,
}

impl Default for ConfigStoreOptions {
    fn default() -> Self {
        Self {
            env: None,
            config_file_name: None,
            load_all: false,
            entries: None,
            markers: TemplateMarkers::default(),
            validation: ValidationOptions::default(),
            base_dir: None,
            env_vars: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl ConfigStoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    pub fn with_config_file_name(mut self, name: impl Into<String>) -> Self {
        self.config_file_name = Some(name.into());
        self
    }

    pub fn with_load_all(mut self, load_all: bool) -> Self {
        self.load_all = load_all;
        self
    }

    /// Entries to merge under the loaded data
    ///
    /// A non-mapping value is ignored with a warning.
    pub fn with_entries(mut self, entries: Value) -> Self {
        match entries {
            Value::Object(map) => self.entries = Some(map),
            other => warn!("Ignoring config entries that are not a mapping: {}", other),
        }
        self
    }

    pub fn with_markers(mut self, markers: TemplateMarkers) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_validation(mut self, validation: ValidationOptions) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// The base directory, falling back to the current directory
    pub fn resolved_base_dir(&self) -> PathBuf {
        if let Some(dir) = &self.base_dir {
            return dir.clone();
        }
        std::env::current_dir().unwrap_or_else(|e| {
            warn!("Cannot determine current directory, using '.': {}", e);
            PathBuf::from(".")
        })
    }

    /// The explicit environment variables, or a snapshot of the process ones
    ///
    /// Variables whose name or value is not valid unicode are left out.
    pub fn resolved_env_vars(&self) -> BTreeMap<String, String> {
        match &self.env_vars {
            Some(vars) => vars.clone(),
            None => std::env::vars_os()
                .filter_map(|(key, value)| {
                    Some((key.into_string().ok()?, value.into_string().ok()?))
                })
                .collect(),
        }
    }
}
