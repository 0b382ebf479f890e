//! The [`ConfigStore`] facade tying the loading stages together

use crate::options::ConfigStoreOptions;
use crate::path::lookup;
use crate::reader::read_config_files;
use crate::template::{build_context, TemplateExpander};
use light_config_entity::{create_entity_and_validate, Entity, EntityResult, Pretty};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Loaded configuration
///
/// `T` is either [`Value`] for an untyped store ([`ConfigStore::load`]) or an
/// [`Entity`] for a validated one ([`ConfigStore::load_validated`]). The store
/// is a snapshot: later changes to the files are not picked up.
#[derive(Debug, Clone)]
pub struct ConfigStore<T = Value> {
    data: T,
    tree: Value,
    source: Option<PathBuf>,
    config_dir: Option<PathBuf>,
}

/// Merged and expanded tree, before any entity mapping
struct Resolved {
    tree: Value,
    source: Option<PathBuf>,
    config_dir: Option<PathBuf>,
}

impl ConfigStore<Value> {
    /// Load configuration without a schema
    ///
    /// Never fails: when no file is found the data is the caller supplied
    /// entries, or an empty mapping.
    pub fn load(options: &ConfigStoreOptions) -> Self {
        let resolved = resolve(options);
        Self {
            data: resolved.tree.clone(),
            tree: resolved.tree,
            source: resolved.source,
            config_dir: resolved.config_dir,
        }
    }
}

impl<T: Entity> ConfigStore<T> {
    /// Load configuration and map it onto `T`
    ///
    /// Fails with the entity creation error if the data cannot be mapped or
    /// does not pass `T`'s schema.
    pub fn load_validated(options: &ConfigStoreOptions) -> EntityResult<Self> {
        let resolved = resolve(options);

        let data = create_entity_and_validate::<T>(resolved.tree.clone(), Some(&options.validation))
            .inspect_err(|e| debug!("Creating config data failed: {}{}", e, Pretty(e.details())))?;

        Ok(Self {
            data,
            tree: resolved.tree,
            source: resolved.source,
            config_dir: resolved.config_dir,
        })
    }
}

impl<T> ConfigStore<T> {
    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    /// Absolute path of the primary file, if one was found
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Directory of the primary file, if one was found
    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    /// The merged and expanded tree the data was created from
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Look a value up by dot path, e.g. `config.db.hosts[0]`
    ///
    /// With `load_all` the first segment is the file name without extension.
    /// Any segment that does not resolve gives `None`. Lookups go through the
    /// tree, not the mapped data, so properties a typed entity does not
    /// declare are still found. This includes properties removed from the data
    /// by [`ValidationOptions::whitelist`](light_config_entity::ValidationOptions).
    ///
    /// ```
    /// use light_config::{ConfigStore, ConfigStoreOptions};
    /// use serde_json::json;
    ///
    /// let options = ConfigStoreOptions::new()
    ///     .with_base_dir("/nonexistent")
    ///     .with_entries(json!({"a": {"b": ["x", "y", "z"]}}));
    /// let store = ConfigStore::load(&options);
    ///
    /// assert_eq!(store.get("a.b[1]"), Some(&json!("y")));
    /// assert_eq!(store.get("a.b[5]"), None);
    /// ```
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.tree, path)
    }

    /// Look a value up by dot path and deserialize it
    pub fn get_as<V: DeserializeOwned>(&self, path: &str) -> Option<V> {
        let value = self.get(path)?;
        serde_json::from_value(value.clone())
            .inspect_err(|e| debug!("Config value at '{}' has an unexpected shape: {}", path, e))
            .ok()
    }
}

fn resolve(options: &ConfigStoreOptions) -> Resolved {
    let loaded = read_config_files(options);
    let mut tree = merge_entries(options.entries.as_ref(), loaded.tree);

    if loaded.template_markers_found {
        match TemplateExpander::new(options.markers.clone()) {
            Ok(expander) => {
                let context = build_context(&tree, &options.resolved_env_vars());
                tree = expander.expand(&tree, &context).tree;
            }
            Err(e) => error!("Skipping template expansion: {}", e),
        }
    }

    Resolved {
        tree,
        source: loaded.source,
        config_dir: loaded.source_dir,
    }
}

/// Layer the loaded tree over the caller supplied entries
///
/// A loaded key replaces an entry of the same name wholesale.
fn merge_entries(entries: Option<&Map<String, Value>>, loaded: Value) -> Value {
    let Some(entries) = entries else {
        return loaded;
    };

    match loaded {
        Value::Object(loaded) => {
            let mut merged = entries.clone();
            merged.extend(loaded);
            Value::Object(merged)
        }
        other => {
            warn!("Loaded config is not a mapping, ignoring supplied entries");
            other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_entries_loaded_keys_win() {
        let entries = json!({"name": "entry", "region": "eu", "db": {"host": "a", "port": 1}});
        let loaded = json!({"name": "file", "db": {"host": "b"}});

        let merged = merge_entries(entries.as_object(), loaded);

        assert_eq!(
            merged,
            json!({"name": "file", "region": "eu", "db": {"host": "b"}})
        );
    }

    #[test]
    fn test_merge_without_entries() {
        let loaded = json!({"name": "file"});
        assert_eq!(merge_entries(None, loaded.clone()), loaded);
    }

    #[test]
    fn test_merge_non_mapping_keeps_loaded() {
        let entries = json!({"name": "entry"});
        assert_eq!(merge_entries(entries.as_object(), json!([1, 2])), json!([1, 2]));
    }

    #[test]
    fn test_store_from_entries_only() {
        let options = ConfigStoreOptions::new()
            .with_base_dir("/nonexistent/light-config")
            .with_env_vars(Vec::<(String, String)>::new())
            .with_entries(json!({"name": "only entries", "list": [1, 2]}));

        let store = ConfigStore::load(&options);

        assert_eq!(store.data(), &json!({"name": "only entries", "list": [1, 2]}));
        assert_eq!(store.source(), None);
        assert_eq!(store.config_dir(), None);
        assert_eq!(store.get_as::<Vec<u32>>("list"), Some(vec![1, 2]));
        assert_eq!(store.get_as::<u32>("name"), None);
    }

    #[test]
    fn test_entries_with_markers_are_not_expanded_without_files() {
        let options = ConfigStoreOptions::new()
            .with_base_dir("/nonexistent/light-config")
            .with_env_vars(Vec::<(String, String)>::new())
            .with_entries(json!({"a": "{{b}}", "b": "x"}));

        let store = ConfigStore::load(&options);

        assert_eq!(store.get("a"), Some(&json!("{{b}}")));
    }
}
