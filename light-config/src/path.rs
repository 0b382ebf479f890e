//! Dot-path lookup over a configuration tree
//!
//! A path is a `.` separated list of segments. A segment is either a plain key
//! (`db`) or a key followed by a sequence index (`hosts[1]`). Any segment that
//! cannot be resolved makes the whole lookup return `None`.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

static INDEXED_SEGMENT_REGEX: OnceLock<Regex> = OnceLock::new();

/// One segment of a lookup path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    /// Mapping key
    Key(&'a str),
    /// Mapping key whose value must be a sequence, then an index into it
    Index(&'a str, usize),
}

impl<'a> PathSegment<'a> {
    /// Parse a single segment
    ///
    /// Returns `None` for an empty segment, or one that contains `[` but is not
    /// of the form `name[digits]`.
    pub fn parse(segment: &'a str) -> Option<Self> {
        if segment.is_empty() {
            return None;
        }
        if !segment.contains('[') {
            return Some(Self::Key(segment));
        }

        let regex = INDEXED_SEGMENT_REGEX.get_or_init(|| {
            Regex::new(r"^(.+)\[([0-9]+)\]$").expect("Failed to compile indexed segment regex")
        });
        let captures = regex.captures(segment)?;
        let key = captures.get(1)?.as_str();
        let index = captures.get(2)?.as_str().parse::<usize>().ok()?;
        Some(Self::Index(key, index))
    }

    fn resolve<'v>(self, node: &'v Value) -> Option<&'v Value> {
        match self {
            Self::Key(key) => node.as_object()?.get(key),
            Self::Index(key, index) => node.as_object()?.get(key)?.as_array()?.get(index),
        }
    }
}

/// Look `path` up in `tree`
///
/// ```
/// use light_config::path::lookup;
/// use serde_json::json;
///
/// let tree = json!({"a": {"b": ["x", "y", "z"]}});
/// assert_eq!(lookup(&tree, "a.b[1]"), Some(&json!("y")));
/// assert_eq!(lookup(&tree, "a.b[5]"), None);
/// ```
pub fn lookup<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    let found = path
        .split('.')
        .try_fold(tree, |node, segment| PathSegment::parse(segment)?.resolve(node));

    if found.is_none() {
        debug!("Nothing found in config for path '{}'", path);
    }
    found
}
