//! Rule-based validation of untyped data against a [`Schema`]
//!
//! Validation walks the declared fields in order and produces a nested
//! [`ValidationError`] tree. Nested schemas contribute `children`, sequence
//! elements contribute children keyed by their index.

use crate::error::{EntityCreationError, EntityResult, ValidationError};
use crate::schema::{CustomRuleError, Field, Rule, Schema};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::trace;

/// Options understood by [`validate`] and the entity creation functions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationOptions {
    /// Skip validation entirely
    pub disable: bool,
    /// Reject data that no declared field describes
    pub forbid_unknown_values: bool,
    /// Strip undeclared properties before mapping
    pub whitelist: bool,
    /// Report undeclared properties as violations
    pub forbid_non_whitelisted: bool,
    /// Skip rules for absent or null properties
    pub skip_missing_properties: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            disable: false,
            forbid_unknown_values: true,
            whitelist: false,
            forbid_non_whitelisted: false,
            skip_missing_properties: false,
        }
    }
}

impl ValidationOptions {
    /// Options with validation switched off
    pub fn disabled() -> Self {
        Self {
            disable: true,
            ..Self::default()
        }
    }
}

const UNKNOWN_VALUE_MESSAGE: &str = "an unknown value was passed to the validate function";

/// Validate `data` against `schema`
///
/// Returns the (possibly empty) list of top-level validation errors. A custom
/// rule may abort validation, in which case its error is returned as `Err`.
pub fn validate(
    schema: &Schema,
    data: &Value,
    options: &ValidationOptions,
) -> EntityResult<Vec<ValidationError>> {
    let validator = Validator {
        options,
        root: schema.name(),
    };

    let empty = Map::new();
    let object = match data {
        Value::Object(map) => map,
        _ if options.forbid_unknown_values => {
            return Ok(vec![unknown_value("", Some(data.clone()))]);
        }
        _ => &empty,
    };

    if schema.is_empty() && options.forbid_unknown_values {
        return Ok(vec![unknown_value("", Some(data.clone()))]);
    }

    validator.validate_object(schema, object)
}

/// Remove properties not declared by `schema`, recursing into nested schemas
pub fn strip_non_whitelisted(schema: &Schema, data: &mut Value) {
    let Value::Object(map) = data else {
        return;
    };

    map.retain(|key, _| schema.get(key).is_some());

    for field in schema.fields() {
        let Some(nested) = field.nested_schema() else {
            continue;
        };
        match map.get_mut(field.name()) {
            Some(Value::Array(items)) if field.is_each() => {
                for item in items.iter_mut() {
                    strip_non_whitelisted(&nested, item);
                }
            }
            Some(value) => strip_non_whitelisted(&nested, value),
            None => {}
        }
    }
}

fn unknown_value(property: &str, value: Option<Value>) -> ValidationError {
    ValidationError::new(property, value).with_constraint("unknownValue", UNKNOWN_VALUE_MESSAGE)
}

struct Validator<'a> {
    options: &'a ValidationOptions,
    root: &'a str,
}

impl Validator<'_> {
    fn validate_object(
        &self,
        schema: &Schema,
        object: &Map<String, Value>,
    ) -> EntityResult<Vec<ValidationError>> {
        let mut errors = Vec::new();

        for field in schema.fields() {
            let value = object.get(field.name());
            let absent = matches!(value, None | Some(Value::Null));
            if absent && (field.is_optional() || self.options.skip_missing_properties) {
                trace!("Skipping absent optional property {}", field.name());
                continue;
            }

            let error = self.validate_field(field, value)?;
            if !error.is_empty() {
                errors.push(error);
            }
        }

        if self.options.forbid_non_whitelisted {
            for (key, value) in object {
                if schema.get(key).is_none() {
                    let message = format!("property {} should not exist", key);
                    errors.push(
                        ValidationError::new(key.clone(), Some(value.clone()))
                            .with_constraint("whitelistValidation", message),
                    );
                }
            }
        }

        Ok(errors)
    }

    fn validate_field(
        &self,
        field: &Field,
        value: Option<&Value>,
    ) -> EntityResult<ValidationError> {
        let name = field.name();
        let mut error = ValidationError::new(name, value.cloned());

        for rule in field.rules() {
            if let Some(message) = self.check_rule(rule, name, value)? {
                error.constraints.insert(rule.constraint_name().to_string(), message);
            }
        }

        if let Some(nested) = field.nested_schema() {
            self.validate_nested(field, &nested, value, &mut error)?;
        }

        Ok(error)
    }

    fn validate_nested(
        &self,
        field: &Field,
        nested: &Schema,
        value: Option<&Value>,
        error: &mut ValidationError,
    ) -> EntityResult<()> {
        let name = field.name();

        match value {
            Some(Value::Array(items)) if field.is_each() => {
                for (index, item) in items.iter().enumerate() {
                    let property = index.to_string();
                    let child = match item {
                        Value::Object(map) => self.nested_node(property, nested, item, map)?,
                        _ => ValidationError::new(property, Some(item.clone())).with_constraint(
                            "nestedValidation",
                            format!(
                                "each value in nested property {} must be either object or array",
                                name
                            ),
                        ),
                    };
                    if !child.is_empty() {
                        error.children.push(child);
                    }
                }
            }
            Some(Value::Object(map)) if !field.is_each() => {
                if nested.is_empty() && self.options.forbid_unknown_values {
                    error
                        .constraints
                        .insert("unknownValue".to_string(), UNKNOWN_VALUE_MESSAGE.to_string());
                } else {
                    error.children.extend(self.validate_object(nested, map)?);
                }
            }
            _ => {
                error.constraints.insert(
                    "nestedValidation".to_string(),
                    format!("nested property {} must be either object or array", name),
                );
            }
        }

        Ok(())
    }

    fn nested_node(
        &self,
        property: String,
        nested: &Schema,
        item: &Value,
        map: &Map<String, Value>,
    ) -> EntityResult<ValidationError> {
        if nested.is_empty() && self.options.forbid_unknown_values {
            return Ok(unknown_value(&property, Some(item.clone())));
        }
        let mut node = ValidationError::new(property, Some(item.clone()));
        node.children = self.validate_object(nested, map)?;
        Ok(node)
    }

    /// Returns the failure message, or `None` when the rule passes
    fn check_rule(
        &self,
        rule: &Rule,
        name: &str,
        value: Option<&Value>,
    ) -> EntityResult<Option<String>> {
        let passed = match rule {
            Rule::IsString => matches!(value, Some(Value::String(_))),
            Rule::IsNumber => value.and_then(Value::as_f64).is_some_and(f64::is_finite),
            Rule::IsInt => value.is_some_and(is_integer),
            Rule::IsBoolean => matches!(value, Some(Value::Bool(_))),
            Rule::IsArray => matches!(value, Some(Value::Array(_))),
            Rule::IsNotEmpty => {
                !matches!(value, None | Some(Value::Null)) && as_str(value) != Some("")
            }
            Rule::IsAlpha => as_str(value)
                .is_some_and(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())),
            Rule::IsBase64 => {
                as_str(value).is_some_and(|s| s.len() % 4 == 0 && base64_regex().is_match(s))
            }
            Rule::MinLength(min) => as_str(value).is_some_and(|s| s.chars().count() >= *min),
            Rule::MaxLength(max) => as_str(value).is_some_and(|s| s.chars().count() <= *max),
            Rule::Min(min) => value.and_then(Value::as_f64).is_some_and(|n| n >= *min),
            Rule::Max(max) => value.and_then(Value::as_f64).is_some_and(|n| n <= *max),
            Rule::Matches(re) => as_str(value).is_some_and(|s| re.is_match(s)),
            Rule::IsIn(allowed) => value.is_some_and(|v| allowed.contains(v)),
            Rule::Custom { check, .. } => {
                return match check(name, value) {
                    Ok(()) => Ok(None),
                    Err(CustomRuleError::Message(message)) => Ok(Some(message)),
                    Err(CustomRuleError::Entity(err)) => Err(err),
                    Err(CustomRuleError::Violation(violation)) => {
                        Err(EntityCreationError::from_validation_errors(
                            format!("Validation failed for {}", self.root),
                            vec![violation],
                        ))
                    }
                };
            }
        };

        if passed {
            return Ok(None);
        }

        let message = match rule {
            Rule::IsString => format!("{} must be a string", name),
            Rule::IsNumber => format!(
                "{} must be a number conforming to the specified constraints",
                name
            ),
            Rule::IsInt => format!("{} must be an integer number", name),
            Rule::IsBoolean => format!("{} must be a boolean value", name),
            Rule::IsArray => format!("{} must be an array", name),
            Rule::IsNotEmpty => format!("{} should not be empty", name),
            Rule::IsAlpha => format!("{} must contain only letters (a-zA-Z)", name),
            Rule::IsBase64 => format!("{} must be base64 encoded", name),
            Rule::MinLength(min) => {
                format!("{} must be longer than or equal to {} characters", name, min)
            }
            Rule::MaxLength(max) => {
                format!("{} must be shorter than or equal to {} characters", name, max)
            }
            Rule::Min(min) => format!("{} must not be less than {}", name, format_number(*min)),
            Rule::Max(max) => format!("{} must not be greater than {}", name, format_number(*max)),
            Rule::Matches(re) => format!("{} must match {} regular expression", name, re.as_str()),
            Rule::IsIn(allowed) => format!(
                "{} must be one of the following values: {}",
                name,
                allowed.iter().map(render_scalar).collect::<Vec<_>>().join(", ")
            ),
            Rule::Custom {
                name: constraint, ..
            } => format!("{} must satisfy {}", name, constraint),
        };
        Ok(Some(message))
    }
}

fn as_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str)
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64()
                || n.is_u64()
                || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn base64_regex() -> &'static Regex {
    static BASE64: OnceLock<Regex> = OnceLock::new();
    BASE64.get_or_init(|| {
        Regex::new(concat!(
            r"^(?:[A-Za-z0-9+/]{4})*",
            r"(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=|[A-Za-z0-9+/]{4})$"
        ))
        .expect("Failed to compile base64 regex")
    })
}
