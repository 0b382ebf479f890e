//! YAML rendering of structured log payloads

use serde::Serialize;
use std::fmt::Debug;

/// Renders a serializable payload as a YAML block for debug logs
///
/// ```
/// use light_config_entity::Pretty;
/// use serde_json::json;
///
/// let rendered = format!("{}", Pretty(&json!({"name": "bad"})));
/// assert_eq!(rendered, "\nname: bad\n");
/// ```
///
/// The block begins on its own line after the log message. Values YAML
/// cannot represent fall back to `{:#?}`.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> std::fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
