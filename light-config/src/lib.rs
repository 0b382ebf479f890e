//! Environment aware configuration loading
//!
//! Configuration is read from the first file found among
//!
//! ```text
//! etc/{env}/{name}  etc/{name}  config/{env}/{name}  config/{name}
//! ```
//!
//! where `env` comes from [`ConfigStoreOptions::env`], the `FP8_ENV`
//! environment variable or defaults to `local`, and `name` is either the
//! configured file name or each of `app.json`, `app.yaml`, `config.json`,
//! `config.yaml` in turn.
//!
//! Loading then runs these stages:
//!
//! 1. With `load_all`, every other loadable file in the same directory is
//!    read too, and each file's data is placed under its file name without
//!    extension (`config.json` becomes `config`).
//! 2. Caller supplied entries are merged under the loaded data.
//! 3. If any file contained `{{`, placeholders such as `{{ db.host }}` or
//!    `{{ ENV.HOME }}` are expanded against the data and the environment.
//! 4. For [`ConfigStore::load_validated`] the data is mapped onto an
//!    [`Entity`] and validated against its [`Schema`].
//!
//! Missing or malformed files are never errors; the only failure reported to
//! callers is an [`EntityCreationError`] from mapping or validation.
//!
//! ```no_run
//! use light_config::{ConfigStore, ConfigStoreOptions, Entity, Field, Rule, Schema};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct AppConfig {
//!     name: String,
//!     port: u16,
//! }
//!
//! impl Entity for AppConfig {
//!     fn schema() -> Schema {
//!         Schema::new("AppConfig")
//!             .field(Field::new("name").rule(Rule::MinLength(1)))
//!             .field(Field::new("port").rule(Rule::IsInt).rule(Rule::Min(1.0)))
//!     }
//! }
//!
//! let store = ConfigStore::<AppConfig>::load_validated(&ConfigStoreOptions::default())?;
//! println!("{} listening on {}", store.data().name, store.data().port);
//! # Ok::<(), light_config::EntityCreationError>(())
//! ```

pub mod discovery;
pub mod error;
pub mod loader;
pub mod options;
pub mod path;
pub mod reader;
pub mod store;
pub mod template;

pub use discovery::{
    candidate_paths, resolve_environment, CandidatePath, DEFAULT_ENVIRONMENT, ENVIRONMENT_VARIABLE,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_file, ConfigFormat, LoadedFile};
pub use options::ConfigStoreOptions;
pub use reader::{read_config, read_config_files, LoadResult};
pub use store::ConfigStore;
pub use template::{build_context, Expansion, TemplateExpander, TemplateMarkers};

pub use light_config_entity::{
    create_entity, create_entity_and_validate, flatten_validation_errors, validate, validate_model,
    CustomCheck, CustomRuleError, Entity, EntityCreationError, EntityCreator, EntityResult, Field,
    FieldViolation, Pretty, Rule, Schema, ValidationError, ValidationOptions,
};
