//! Candidate path generation for configuration files
//!
//! The primary configuration file is searched for under two root directories,
//! `etc` then `config`. Inside each root an environment specific sub
//! directory is probed before the root itself, for each candidate file name
//! in order. The first candidate that loads wins.

use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::trace;

/// Environment variable selecting the environment segment
pub const ENVIRONMENT_VARIABLE: &str = "FP8_ENV";

/// Environment used when neither an explicit value nor the variable is set
pub const DEFAULT_ENVIRONMENT: &str = "local";

/// Root directories, in search order
pub const CONFIG_DIRECTORIES: [&str; 2] = ["etc", "config"];

/// Base names tried when no file name is given, in search order
pub const CONFIG_BASE_NAMES: [&str; 2] = ["app", "config"];

/// Extensions tried when no file name is given, and the loader allow-list
pub const DEFAULT_EXTENSIONS: [&str; 2] = [".json", ".yaml"];

/// One location to probe for the primary configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePath {
    /// Root directory name (`etc` or `config`)
    pub directory: String,
    /// Environment sub directory, `None` for the flat path
    pub environment: Option<String>,
    /// File name without extension
    pub base_name: String,
    /// Extension including the leading dot, empty when the name has none
    pub extension: String,
}

impl CandidatePath {
    /// `{base_name}{extension}`
    pub fn file_name(&self) -> String {
        format!("{}{}", self.base_name, self.extension)
    }

    /// Path relative to the base directory
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::from(&self.directory);
        if let Some(env) = &self.environment {
            path.push(env);
        }
        path.push(self.file_name());
        path
    }
}

/// Resolve the environment segment
///
/// Order: explicit value, then [`ENVIRONMENT_VARIABLE`] in `env_vars`, then
/// [`DEFAULT_ENVIRONMENT`].
pub fn resolve_environment(explicit: Option<&str>, env_vars: &BTreeMap<String, String>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| env_vars.get(ENVIRONMENT_VARIABLE).cloned())
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}

/// Build the ordered candidate list
///
/// Without a file name every base name is combined with every extension
/// (base name outer). The directory loop is outermost, the file name loop
/// inner, and the environment scoped path of each pair comes before the flat
/// one. The list is never empty.
pub fn candidate_paths(
    environment: &str,
    file_name: Option<&str>,
    extensions: &[String],
) -> Vec<CandidatePath> {
    let file_names: Vec<(String, String)> = match file_name {
        Some(name) => vec![split_file_name(name)],
        None => CONFIG_BASE_NAMES
            .iter()
            .flat_map(|base| extensions.iter().map(move |ext| (base.to_string(), ext.clone())))
            .collect(),
    };

    let mut candidates = Vec::with_capacity(CONFIG_DIRECTORIES.len() * file_names.len() * 2);
    for directory in CONFIG_DIRECTORIES {
        for (base_name, extension) in &file_names {
            for environment in [Some(environment.to_string()), None] {
                candidates.push(CandidatePath {
                    directory: directory.to_string(),
                    environment,
                    base_name: base_name.clone(),
                    extension: extension.clone(),
                });
            }
        }
    }

    trace!("Generated {} candidate config paths", candidates.len());
    candidates
}

/// Split `name` into base name and extension (with its dot)
///
/// The extension is everything from the last dot, unless the dot is leading.
pub(crate) fn split_file_name(name: &str) -> (String, String) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => (name[..pos].to_string(), name[pos..].to_string()),
        _ => (name.to_string(), String::new()),
    }
}
