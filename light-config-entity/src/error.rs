//! Error types for entity creation and validation

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result type for entity creation
pub type EntityResult<T> = std::result::Result<T, EntityCreationError>;

/// A single node of the nested validation error tree
///
/// A node either carries constraint failures for its own property, nested
/// `children` for the properties of a nested value, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Property name, or the element index for items of a validated sequence
    pub property: String,
    /// The offending value, `None` when the property was absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Constraint name to human readable message
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub constraints: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ValidationError>,
}

impl ValidationError {
    /// Create an error for `property` with no constraints yet
    pub fn new(property: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            property: property.into(),
            value,
            constraints: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Add a constraint failure
    pub fn with_constraint(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.constraints.insert(name.into(), message.into());
        self
    }

    /// Add a nested child error
    pub fn with_child(mut self, child: ValidationError) -> Self {
        self.children.push(child);
        self
    }

    /// True when this node has nothing to report
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty() && self.children.is_empty()
    }
}

/// Flattened, leaf-level violation of a single field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default)]
    pub constraints: IndexMap<String, String>,
}

/// Error raised when data cannot be turned into a valid entity
///
/// `fields` maps dot-delimited field paths to the leaf violations found under
/// them. It is empty when the failure happened while mapping rather than
/// while validating.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct EntityCreationError {
    message: String,
    fields: IndexMap<String, FieldViolation>,
    details: Vec<ValidationError>,
}

impl EntityCreationError {
    /// Create an error with no field detail
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: IndexMap::new(),
            details: Vec::new(),
        }
    }

    /// Create an error from a nested validation error tree
    pub fn from_validation_errors(
        message: impl Into<String>,
        details: Vec<ValidationError>,
    ) -> Self {
        let fields = flatten_validation_errors(&details);
        Self {
            message: message.into(),
            fields,
            details,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Leaf violations keyed by dot-delimited field path
    pub fn fields(&self) -> &IndexMap<String, FieldViolation> {
        &self.fields
    }

    /// The raw nested error tree the field map was flattened from
    pub fn details(&self) -> &[ValidationError] {
        &self.details
    }

    /// The raw error tree as JSON, for structured logging
    pub fn details_json(&self) -> Value {
        serde_json::to_value(&self.details).unwrap_or(Value::Null)
    }
}

/// Flatten a nested validation error tree into leaf violations
///
/// Only nodes without children are reported. A node with children is never
/// reported itself, its descendants are, with their property names joined to
/// the parent's path by `.`.
pub fn flatten_validation_errors(errors: &[ValidationError]) -> IndexMap<String, FieldViolation> {
    let mut fields = IndexMap::new();
    collect_leaves(errors, None, &mut fields);
    fields
}

fn collect_leaves(
    errors: &[ValidationError],
    parent: Option<&str>,
    fields: &mut IndexMap<String, FieldViolation>,
) {
    for error in errors {
        let path = match parent {
            Some(parent) => format!("{}.{}", parent, error.property),
            None => error.property.clone(),
        };

        if error.children.is_empty() {
            fields.insert(
                path,
                FieldViolation {
                    value: error.value.clone(),
                    constraints: error.constraints.clone(),
                },
            );
        } else {
            collect_leaves(&error.children, Some(&path), fields);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leaf(property: &str, value: Value, constraint: (&str, &str)) -> ValidationError {
        ValidationError::new(property, Some(value)).with_constraint(constraint.0, constraint.1)
    }

    #[test]
    fn test_flatten_single_leaf() {
        let errors = vec![leaf(
            "testProperty",
            json!("testValue"),
            ("constraint1", "constraint1Value"),
        )];

        let fields = flatten_validation_errors(&errors);

        assert_eq!(fields.len(), 1);
        let violation = &fields["testProperty"];
        assert_eq!(violation.value, Some(json!("testValue")));
        assert_eq!(violation.constraints["constraint1"], "constraint1Value");
    }

    #[test]
    fn test_flatten_reports_only_children_of_parent() {
        let child = leaf(
            "childProperty",
            json!("childValue"),
            ("childConstraint1", "childConstraint1Value"),
        );
        let errors = vec![leaf(
            "testProperty",
            json!("testValue"),
            ("constraint1", "constraint1Value"),
        )
        .with_child(child)];

        let fields = flatten_validation_errors(&errors);

        assert_eq!(fields.len(), 1);
        assert!(!fields.contains_key("testProperty"));
        let child = &fields["testProperty.childProperty"];
        assert_eq!(child.value, Some(json!("childValue")));
        assert_eq!(child.constraints["childConstraint1"], "childConstraint1Value");
    }

    #[test]
    fn test_flatten_deeply_nested_and_siblings() {
        let errors = vec![
            leaf("name", json!("bad"), ("minLength", "name is too short")),
            ValidationError::new("db", Some(json!({"password": 123}))).with_child(leaf(
                "password",
                json!(123),
                ("isString", "password must be a string"),
            )),
            ValidationError::new("servers", None).with_child(
                ValidationError::new("0", None).with_child(leaf(
                    "host",
                    json!(""),
                    ("isNotEmpty", "host should not be empty"),
                )),
            ),
        ];

        let fields = flatten_validation_errors(&errors);

        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "db.password", "servers.0.host"]);
    }

    #[test]
    fn test_flatten_keeps_absent_value_as_none() {
        let errors = vec![
            ValidationError::new("city", None).with_constraint("isString", "city must be a string")
        ];

        let fields = flatten_validation_errors(&errors);

        assert_eq!(fields["city"].value, None);
    }

    #[test]
    fn test_entity_creation_error_display_is_message() {
        let err = EntityCreationError::new("Failed to create instance of ConfigData: boom");
        assert_eq!(err.to_string(), "Failed to create instance of ConfigData: boom");
        assert!(err.fields().is_empty());
        assert!(err.details().is_empty());
    }

    #[test]
    fn test_details_json_round_trips_tree_shape() {
        let err = EntityCreationError::from_validation_errors(
            "Validation failed for ConfigData",
            vec![ValidationError::new("db", None).with_child(leaf(
                "password",
                json!(123),
                ("isString", "password must be a string"),
            ))],
        );

        let details = err.details_json();
        assert_eq!(details[0]["property"], "db");
        assert_eq!(
            details[0]["children"][0]["constraints"]["isString"],
            "password must be a string"
        );
    }
}
