//! Typed entity creation and validation for light-config
//!
//! This crate turns untyped configuration trees (`serde_json::Value`) into
//! strongly typed, validated objects. Each entity type declares a [`Schema`]:
//! an ordered list of fields, the [`Rule`]s their values must satisfy, and
//! references to the schemas of nested entities.
//!
//! Validation produces a nested [`ValidationError`] tree which is flattened
//! into a single-level map of dot-delimited field paths to leaf
//! [`FieldViolation`]s. Only leaves are ever reported: a nested entity with
//! failing properties shows up as `db.password`, never as `db`.
//!
//! ```
//! use light_config_entity::{create_entity_and_validate, Entity, Field, Rule, Schema};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize)]
//! struct DatabaseConfig {
//!     username: String,
//!     password: String,
//! }
//!
//! impl Entity for DatabaseConfig {
//!     fn schema() -> Schema {
//!         Schema::new("DatabaseConfig")
//!             .field(Field::new("username").rule(Rule::IsString))
//!             .field(Field::new("password").rule(Rule::IsString))
//!     }
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct ConfigData {
//!     name: String,
//!     db: DatabaseConfig,
//! }
//!
//! impl Entity for ConfigData {
//!     fn schema() -> Schema {
//!         Schema::new("ConfigData")
//!             .field(Field::new("name").rule(Rule::MinLength(5)))
//!             .field(Field::new("db").nested::<DatabaseConfig>())
//!     }
//! }
//!
//! let data = json!({"name": "bad", "db": {"username": "admin", "password": 123}});
//! let err = create_entity_and_validate::<ConfigData>(data, None).unwrap_err();
//!
//! assert!(err.fields().contains_key("name"));
//! assert!(err.fields().contains_key("db.password"));
//! assert!(!err.fields().contains_key("db"));
//! ```

pub mod creator;
pub mod error;
pub mod logging;
pub mod schema;
pub mod validation;

pub use creator::{create_entity, create_entity_and_validate, validate_model, EntityCreator};
pub use error::{
    flatten_validation_errors, EntityCreationError, EntityResult, FieldViolation, ValidationError,
};
pub use logging::Pretty;
pub use schema::{CustomCheck, CustomRuleError, Entity, Field, Rule, Schema};
pub use validation::{strip_non_whitelisted, validate, ValidationOptions};
