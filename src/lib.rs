//! Schema-driven validation of parsed JSON values.
//!
//! Build a [`Schema`] once with the combinators in [`schema`], then check any
//! number of `serde_json::Value`s against it:
//!
//! ```
//! use json_vet::schema::{array, number, object, optional_property, property, string};
//! use serde_json::json;
//!
//! let users = array(object(vec![
//!     property("id", number()),
//!     property("name", string()),
//!     optional_property("website", string()),
//! ]));
//!
//! let ok = json!([{ "id": 1, "name": "Leanne" }]);
//! assert!(json_vet::validate(&users, &ok).is_ok());
//!
//! let bad = json!([{ "id": "1", "name": "Leanne" }]);
//! let error = json_vet::validate(&users, &bad).unwrap_err();
//! assert!(error.to_string().starts_with("expected \"1\" to be of type \"number\", for property \"id\""));
//! ```
pub mod classify;
pub mod cli;
pub mod document;
pub mod error;
pub mod jq_exec;
pub mod path_de;
pub mod render;
pub mod schema;
pub mod validate;

pub use classify::{classify, TypeTag};
pub use document::{load_schema_file, parse_schema, LoadError};
pub use error::{ErrorKind, ValidationError};
pub use schema::Schema;
pub use validate::{ensure_valid, validate, validate_owned, Validator, ValidatorOptions};
