//! Declarative entity schemas
//!
//! A [`Schema`] is an ordered list of [`Field`]s, each carrying the rules its
//! value must satisfy and, optionally, a reference to the schema of a nested
//! entity. Schemas are plain data interpreted by [`crate::validation::validate`].

use crate::error::{EntityCreationError, ValidationError};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A type that can be created from untyped configuration data
///
/// ```
/// use light_config_entity::{Entity, Field, Rule, Schema};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct DatabaseConfig {
///     username: String,
///     password: String,
/// }
///
/// impl Entity for DatabaseConfig {
///     fn schema() -> Schema {
///         Schema::new("DatabaseConfig")
///             .field(Field::new("username").rule(Rule::IsString))
///             .field(Field::new("password").rule(Rule::IsString))
///     }
/// }
///
/// assert_eq!(DatabaseConfig::schema().fields().len(), 2);
/// ```
pub trait Entity: DeserializeOwned {
    fn schema() -> Schema;
}

/// Ordered field declarations for one entity type
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field declaration
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a declared field by name
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// True when the schema declares no fields at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One declared field of a schema
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    rules: Vec<Rule>,
    nested: Option<fn() -> Schema>,
    each: bool,
    optional: bool,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            nested: None,
            each: false,
            optional: false,
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Validate the value against the schema of `E`
    pub fn nested<E: Entity>(mut self) -> Self {
        self.nested = Some(E::schema);
        self
    }

    /// Validate every element of a sequence value against the nested schema
    pub fn each(mut self) -> Self {
        self.each = true;
        self
    }

    /// Skip all rules when the value is absent or null
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn nested_schema(&self) -> Option<Schema> {
        self.nested.map(|schema| schema())
    }

    pub fn is_each(&self) -> bool {
        self.each
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// Failure raised by a custom rule
#[derive(Debug, Clone)]
pub enum CustomRuleError {
    /// Ordinary constraint failure, recorded under the rule's name
    Message(String),
    /// Abort validation and surface this error unchanged
    Entity(EntityCreationError),
    /// Abort validation and surface this single violation
    Violation(ValidationError),
}

pub type CustomCheck =
    Arc<dyn Fn(&str, Option<&Value>) -> Result<(), CustomRuleError> + Send + Sync>;

/// A single constraint on a field value
///
/// Constraint names and messages follow the conventions of class-validator so
/// error reports stay familiar to consumers of the same configuration files.
#[derive(Clone)]
pub enum Rule {
    IsString,
    IsNumber,
    IsInt,
    IsBoolean,
    IsArray,
    IsNotEmpty,
    IsAlpha,
    IsBase64,
    MinLength(usize),
    MaxLength(usize),
    Min(f64),
    Max(f64),
    Matches(Regex),
    IsIn(Vec<Value>),
    Custom { name: String, check: CustomCheck },
}

impl Rule {
    /// Build a custom rule from a closure receiving the property name and value
    pub fn custom<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str, Option<&Value>) -> Result<(), CustomRuleError> + Send + Sync + 'static,
    {
        Rule::Custom {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Constraint name reported when the rule fails
    pub fn constraint_name(&self) -> &str {
        match self {
            Rule::IsString => "isString",
            Rule::IsNumber => "isNumber",
            Rule::IsInt => "isInt",
            Rule::IsBoolean => "isBoolean",
            Rule::IsArray => "isArray",
            Rule::IsNotEmpty => "isNotEmpty",
            Rule::IsAlpha => "isAlpha",
            Rule::IsBase64 => "isBase64",
            Rule::MinLength(_) => "minLength",
            Rule::MaxLength(_) => "maxLength",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::Matches(_) => "matches",
            Rule::IsIn(_) => "isIn",
            Rule::Custom { name, .. } => name,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::MinLength(n) => write!(f, "MinLength({})", n),
            Rule::MaxLength(n) => write!(f, "MaxLength({})", n),
            Rule::Min(n) => write!(f, "Min({})", n),
            Rule::Max(n) => write!(f, "Max({})", n),
            Rule::Matches(re) => write!(f, "Matches({})", re.as_str()),
            Rule::IsIn(values) => write!(f, "IsIn({:?})", values),
            Rule::Custom { name, .. } => write!(f, "Custom({})", name),
            other => f.write_str(other.constraint_name()),
        }
    }
}
