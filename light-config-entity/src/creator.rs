//! Mapping untyped data onto validated entities

use crate::error::{EntityCreationError, EntityResult, ValidationError};
use crate::logging::Pretty;
use crate::schema::Entity;
use crate::validation::{strip_non_whitelisted, validate, ValidationOptions};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Map `data` onto `T` and validate it against `T::schema()`
///
/// A mapping failure is reported with an empty field set, unless validating
/// the raw data explains it, in which case the validation error is reported
/// instead. Invalid instances are never returned.
///
/// ```
/// use light_config_entity::{create_entity_and_validate, Entity, Field, Rule, Schema};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Debug, Deserialize)]
/// struct JustName {
///     name: String,
/// }
///
/// impl Entity for JustName {
///     fn schema() -> Schema {
///         Schema::new("JustName").field(Field::new("name").rule(Rule::MinLength(5)))
///     }
/// }
///
/// let ok: JustName = create_entity_and_validate(json!({"name": "light-config"}), None)?;
/// assert_eq!(ok.name, "light-config");
///
/// let err = create_entity_and_validate::<JustName>(json!({"name": "bad"}), None).unwrap_err();
/// assert!(err.fields()["name"].constraints.contains_key("minLength"));
/// # Ok::<(), light_config_entity::EntityCreationError>(())
/// ```
pub fn create_entity_and_validate<T: Entity>(
    data: Value,
    options: Option<&ValidationOptions>,
) -> EntityResult<T> {
    let options = options.cloned().unwrap_or_default();
    let schema = T::schema();
    let type_name = schema.name().to_string();

    let mut data = data;
    if options.whitelist && !options.disable {
        strip_non_whitelisted(&schema, &mut data);
    }

    let instance = match serde_json::from_value::<T>(data.clone()) {
        Ok(instance) => instance,
        Err(e) => {
            if !options.disable {
                let errors = validate(&schema, &data, &options)?;
                if !errors.is_empty() {
                    return Err(validation_failed(&type_name, errors));
                }
            }
            debug!("Creating {} failed with data: {}", type_name, data);
            return Err(EntityCreationError::new(format!(
                "Failed to create instance of {}: {}",
                type_name, e
            )));
        }
    };

    if options.disable {
        debug!("Validation disabled, returning unvalidated {}", type_name);
        return Ok(instance);
    }

    let errors = validate(&schema, &data, &options)?;
    if !errors.is_empty() {
        return Err(validation_failed(&type_name, errors));
    }

    Ok(instance)
}

/// Validate an already constructed instance
///
/// The instance is serialized back to a tree and checked against its schema.
pub fn validate_model<T: Entity + Serialize>(
    instance: &T,
    options: Option<&ValidationOptions>,
) -> EntityResult<()> {
    let options = options.cloned().unwrap_or_default();
    if options.disable {
        return Ok(());
    }

    let schema = T::schema();
    let data = serde_json::to_value(instance).map_err(|e| {
        EntityCreationError::new(format!(
            "Failed to serialize instance of {}: {}",
            schema.name(),
            e
        ))
    })?;

    let errors = validate(&schema, &data, &options)?;
    if errors.is_empty() {
        Ok(())
    } else {
        Err(validation_failed(schema.name(), errors))
    }
}

/// An entity that converts its input before it is mapped and validated
pub trait EntityCreator: Entity {
    /// Transform the raw data, e.g. to derive or normalize fields
    fn convert(data: Value) -> EntityResult<Value> {
        Ok(data)
    }
}

/// Run `T::convert` and then [`create_entity_and_validate`]
pub fn create_entity<T: EntityCreator>(
    data: Value,
    options: Option<&ValidationOptions>,
) -> EntityResult<T> {
    let input = T::convert(data)?;
    create_entity_and_validate(input, options)
}

fn validation_failed(type_name: &str, errors: Vec<ValidationError>) -> EntityCreationError {
    let message = format!("Validation failed for {}", type_name);
    let err = EntityCreationError::from_validation_errors(message, errors);
    debug!("{}: {}", err, Pretty(err.fields()));
    err
}
