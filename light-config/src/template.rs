//! Mustache style placeholder expansion over a configuration tree
//!
//! The tree is serialized to JSON text and every `{{ path }}` placeholder is
//! replaced by the value found at `path` in a substitution context. A
//! replaced value may itself contain placeholders, so passes are repeated
//! until none remain, up to [`MAX_TEMPLATE_PASSES`]. Placeholders that never
//! resolve (for example a value referencing itself) are left in place.

use crate::error::{ConfigError, ConfigResult};
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{error, trace, warn};

/// Maximum number of substitution passes over the serialized tree
pub const MAX_TEMPLATE_PASSES: usize = 5;

/// Context key holding the environment variables
pub const ENV_CONTEXT_KEY: &str = "ENV";

/// Open and close delimiters of a placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMarkers {
    pub open: String,
    pub close: String,
}

impl TemplateMarkers {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Whether `text` contains the open marker
    pub fn contained_in(&self, text: &str) -> bool {
        !self.open.is_empty() && text.contains(&self.open)
    }
}

impl Default for TemplateMarkers {
    fn default() -> Self {
        Self::new("{{", "}}")
    }
}

/// Outcome of [`TemplateExpander::expand`]
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    pub tree: Value,
    /// Number of substitution passes run
    pub passes: usize,
    /// False when placeholders remained after the last pass
    pub resolved: bool,
}

/// Expands placeholders delimited by a [`TemplateMarkers`] pair
#[derive(Debug, Clone)]
pub struct TemplateExpander {
    markers: TemplateMarkers,
    pattern: Regex,
}

impl TemplateExpander {
    /// Build an expander for `markers`
    ///
    /// The expression between the markers may not contain a double quote, so a
    /// placeholder never spans two strings of the serialized tree. The
    /// unescaped forms `{{{ name }}}` and `{{& name }}` are accepted and render
    /// the same as `{{ name }}`.
    pub fn new(markers: TemplateMarkers) -> ConfigResult<Self> {
        let open = regex::escape(&markers.open);
        let close = regex::escape(&markers.close);
        let pattern = format!(
            r#"{open}\{{\s*([^"]+?)\s*\}}{close}|{open}&?\s*([^"]+?)\s*{close}"#
        );
        let pattern = Regex::new(&pattern).map_err(|source| ConfigError::TemplatePattern {
            open: markers.open.clone(),
            close: markers.close.clone(),
            source,
        })?;

        Ok(Self { markers, pattern })
    }

    pub fn markers(&self) -> &TemplateMarkers {
        &self.markers
    }

    /// Expand `target` against `context`
    ///
    /// Never fails. If the tree cannot be serialized, or the expanded text is no
    /// longer a valid tree, the error is logged and `target` is returned as is.
    ///
    /// ```
    /// use light_config::template::{TemplateExpander, TemplateMarkers};
    /// use serde_json::json;
    ///
    /// let expander = TemplateExpander::new(TemplateMarkers::default())?;
    /// let context = json!({
    ///     "data": {"domain": "example.com", "url": "https://{{data.domain}}/info"}
    /// });
    ///
    /// let expansion = expander.expand(&json!({"url": "{{data.url}}"}), &context);
    ///
    /// assert_eq!(expansion.tree["url"], "https://example.com/info");
    /// assert_eq!(expansion.passes, 2);
    /// assert!(expansion.resolved);
    /// # Ok::<(), light_config::ConfigError>(())
    /// ```
    pub fn expand(&self, target: &Value, context: &Value) -> Expansion {
        match self.try_expand(target, context) {
            Ok(expansion) => expansion,
            Err(e) => {
                error!("Template expansion failed, keeping the unexpanded config: {}", e);
                Expansion {
                    tree: target.clone(),
                    passes: 0,
                    resolved: !self.markers.contained_in(&target.to_string()),
                }
            }
        }
    }

    /// Expand `target` against `context`, reporting serialization failures
    pub fn try_expand(&self, target: &Value, context: &Value) -> ConfigResult<Expansion> {
        let mut blob = serde_json::to_string(target)
            .map_err(|source| ConfigError::TemplateSerialize { source })?;

        let mut passes = 0;
        while passes < MAX_TEMPLATE_PASSES && self.markers.contained_in(&blob) {
            blob = self.render_pass(&blob, context);
            passes += 1;
            trace!("Template pass {} produced: {}", passes, blob);
        }

        let resolved = !self.markers.contained_in(&blob);
        if !resolved {
            warn!(
                "Template expansion stopped after {} passes with unresolved placeholders",
                passes
            );
        }

        let tree = serde_json::from_str(&blob)
            .map_err(|source| ConfigError::TemplateDeserialize { source })?;
        Ok(Expansion { tree, passes, resolved })
    }

    fn render_pass(&self, blob: &str, context: &Value) -> String {
        self.pattern
            .replace_all(blob, |caps: &Captures| {
                let expression = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map_or("", |m| m.as_str().trim());
                let rendered = render_value(lookup(context, expression));
                escape_json_fragment(&rendered)
            })
            .into_owned()
    }
}

/// The substitution context: `tree` plus [`ENV_CONTEXT_KEY`] mapped to `env_vars`
///
/// An `ENV` key already present in `tree` is replaced.
pub fn build_context(tree: &Value, env_vars: &BTreeMap<String, String>) -> Value {
    let mut context = match tree {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    let env: Map<String, Value> = env_vars
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();
    context.insert(ENV_CONTEXT_KEY.to_string(), Value::Object(env));
    Value::Object(context)
}

/// Resolve a `.` separated expression, numeric segments index sequences
fn lookup<'a>(context: &'a Value, expression: &str) -> Option<&'a Value> {
    if expression.is_empty() {
        return None;
    }
    expression.split('.').try_fold(context, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    })
}

fn render_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Escape `text` for splicing into a JSON string literal
fn escape_json_fragment(text: &str) -> String {
    let quoted = Value::String(text.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}
