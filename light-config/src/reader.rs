//! Reading the primary configuration file and, optionally, its siblings

use crate::discovery::{candidate_paths, resolve_environment, split_file_name};
use crate::loader::load_file;
use crate::options::ConfigStoreOptions;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};
use walkdir::WalkDir;

/// Outcome of reading configuration files
///
/// When nothing was found the tree is an empty mapping and both paths are
/// `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    pub tree: Value,
    /// Absolute path of the primary file
    pub source: Option<PathBuf>,
    /// Directory containing the primary file
    pub source_dir: Option<PathBuf>,
    /// Whether any loaded file contained the template open marker
    pub template_markers_found: bool,
}

impl Default for LoadResult {
    fn default() -> Self {
        Self {
            tree: Value::Object(Map::new()),
            source: None,
            source_dir: None,
            template_markers_found: false,
        }
    }
}

impl LoadResult {
    /// True when a primary file was found
    pub fn is_found(&self) -> bool {
        self.source.is_some()
    }
}

/// Read the first candidate file that exists and loads
///
/// Candidates come from [`candidate_paths`] and are resolved against the
/// options' base directory. Finding nothing is not an error.
pub fn read_config(options: &ConfigStoreOptions) -> LoadResult {
    let env_vars = options.resolved_env_vars();
    let environment = resolve_environment(options.env.as_deref(), &env_vars);
    let base_dir = options.resolved_base_dir();

    let file_name = options.config_file_name.as_deref();
    for candidate in candidate_paths(&environment, file_name, &options.extensions) {
        let path = absolute(&base_dir.join(candidate.relative_path()));
        trace!("Looking for config file {}", path.display());

        if !path.is_file() {
            continue;
        }

        if let Some(loaded) = load_file(&path, &options.extensions, &options.markers) {
            info!("Config found and read from {}", path.display());
            return LoadResult {
                tree: loaded.tree,
                source_dir: path.parent().map(Path::to_path_buf),
                source: Some(path),
                template_markers_found: loaded.template_markers_found,
            };
        }
    }

    debug!(
        "No config file found for environment '{}' under {}",
        environment,
        base_dir.display()
    );
    LoadResult::default()
}

/// Read the primary file and, if `load_all` is set, every sibling file
///
/// Each file is placed under its file name without extension, the primary
/// file last so it always keeps its key. Siblings that cannot be loaded are
/// skipped.
pub fn read_config_files(options: &ConfigStoreOptions) -> LoadResult {
    let primary = read_config(options);
    if !options.load_all {
        return primary;
    }

    let (Some(source), Some(source_dir)) = (primary.source.clone(), primary.source_dir.clone())
    else {
        debug!("No primary config file found, nothing to aggregate");
        return primary;
    };

    let mut tree = Map::new();
    let mut template_markers_found = primary.template_markers_found;

    let siblings = WalkDir::new(&source_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in siblings {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry in {}: {}", source_dir.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || path == source {
            continue;
        }

        match load_file(path, &options.extensions, &options.markers) {
            Some(loaded) => {
                trace!("Loaded sibling config file {}", path.display());
                template_markers_found |= loaded.template_markers_found;
                tree.insert(file_key(path), loaded.tree);
            }
            None => debug!("Skipping sibling config file {}", path.display()),
        }
    }

    tree.insert(file_key(&source), primary.tree);

    LoadResult {
        tree: Value::Object(tree),
        source: Some(source),
        source_dir: Some(source_dir),
        template_markers_found,
    }
}

/// File name without its extension
fn file_key(path: &Path) -> String {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    split_file_name(&name).0
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
