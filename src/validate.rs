//! Recursive descent over (schema, value) pairs.
//!
//! Arrays and objects stop at the first failing child; a union always runs
//! every alternative so its message can name all of them. Nothing is copied
//! or mutated: success hands back the caller's own reference.
use serde_json::Value;
use tracing::{debug, trace};

use crate::classify::{classify, TypeTag};
use crate::error::ValidationError;
use crate::render::{render_items, render_key, render_tag, render_value};
use crate::schema::{ArrayMode, IndexEntry, Presence, Property, Schema};

pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Schema levels descended before giving up with `TooDeep`.
    pub max_depth: usize,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    options: ValidatorOptions,
}

impl Validator {
    pub fn new(options: ValidatorOptions) -> Self { Self { options } }

    pub fn options(&self) -> ValidatorOptions { self.options }

    pub fn validate<'v>(&self, schema: &Schema, value: &'v Value) -> Result<&'v Value, ValidationError> {
        match self.node(schema, Some(value), 1) {
            Ok(()) => Ok(value),
            Err(error) => {
                debug!(path = %error.path(), kind = ?error.kind(), "value rejected");
                Err(error)
            }
        }
    }

    pub fn check(&self, schema: &Schema, value: &Value) -> bool {
        self.node(schema, Some(value), 1).is_ok()
    }

    fn node(&self, schema: &Schema, value: Option<&Value>, depth: usize) -> Result<(), ValidationError> {
        if depth > self.options.max_depth {
            return Err(ValidationError::TooDeep { limit: self.options.max_depth });
        }
        trace!(depth, schema = ?schema.declared_type(), found = %classify(value), "visit");
        match schema {
            Schema::String => expect_type(value, TypeTag::String),
            Schema::Number => expect_type(value, TypeTag::Number),
            Schema::Boolean => expect_type(value, TypeTag::Boolean),
            Schema::Null => expect_type(value, TypeTag::Null),
            Schema::Array(mode) => match (classify(value), value) {
                (TypeTag::Array, Some(Value::Array(items))) => match mode {
                    ArrayMode::Uniform(item) => self.uniform(item, items, depth),
                    ArrayMode::Indexed(entries) => self.indexed(entries, items, depth),
                },
                _ => Err(mismatch(value, TypeTag::Array)),
            },
            Schema::Object(props) => match (classify(value), value) {
                (TypeTag::Object, Some(object)) => self.object(props, object, depth),
                _ => Err(mismatch(value, TypeTag::Object)),
            },
            Schema::OneOf(alternatives) => self.one_of(alternatives, value, depth),
        }
    }

    fn uniform(&self, item: &Schema, items: &[Value], depth: usize) -> Result<(), ValidationError> {
        for (i, el) in items.iter().enumerate() {
            self.node(item, Some(el), depth + 1)
                .map_err(|cause| at_index(cause, i, items))?;
        }
        Ok(())
    }

    fn indexed(&self, entries: &[IndexEntry], items: &[Value], depth: usize) -> Result<(), ValidationError> {
        // out of range reads as an absent value
        for IndexEntry { index, schema } in entries {
            self.node(schema, items.get(*index), depth + 1)
                .map_err(|cause| at_index(cause, *index, items))?;
        }
        Ok(())
    }

    fn object(&self, props: &[Property], object: &Value, depth: usize) -> Result<(), ValidationError> {
        for Property { key, schema, presence } in props {
            let Some(field) = object.get(key) else {
                match presence {
                    Presence::Optional => continue,
                    Presence::Required => {
                        return Err(ValidationError::MissingProperty {
                            object: render_value(Some(object)),
                            key: render_key(key),
                        });
                    }
                }
            };
            if let Err(cause) = self.node(schema, Some(field), depth + 1) {
                let cause = Box::new(cause);
                let key = render_key(key);
                let object = render_value(Some(object));
                return Err(match presence {
                    Presence::Required => ValidationError::InProperty { cause, key, object },
                    Presence::Optional => ValidationError::InOptionalProperty { cause, key, object },
                });
            }
        }
        Ok(())
    }

    fn one_of(&self, alternatives: &[Schema], value: Option<&Value>, depth: usize) -> Result<(), ValidationError> {
        // no short-circuit: every alternative is evaluated
        let results = alternatives
            .iter()
            .map(|alt| self.node(alt, value, depth + 1))
            .collect::<Vec<_>>();
        if results.iter().any(Result::is_ok) {
            return Ok(());
        }
        let errors = results.into_iter().filter_map(Result::err).collect();
        Err(ValidationError::NoAlternativeMatched(errors))
    }
}

fn expect_type(value: Option<&Value>, expected: TypeTag) -> Result<(), ValidationError> {
    if classify(value) == expected {
        return Ok(());
    }
    Err(mismatch(value, expected))
}

fn mismatch(value: Option<&Value>, expected: TypeTag) -> ValidationError {
    ValidationError::TypeMismatch {
        value: render_value(value),
        expected: render_tag(expected),
    }
}

fn at_index(cause: ValidationError, index: usize, items: &[Value]) -> ValidationError {
    ValidationError::AtIndex { cause: Box::new(cause), index, array: render_items(items) }
}

// ------------------------------- Front API -------------------------------- //

/// Check `value` against `schema` with default options.
///
/// On success the returned reference is `value` itself.
pub fn validate<'v>(schema: &Schema, value: &'v Value) -> Result<&'v Value, ValidationError> {
    Validator::default().validate(schema, value)
}

/// Owned variant: the value is moved back out untouched on success.
pub fn validate_owned(schema: &Schema, value: Value) -> Result<Value, ValidationError> {
    Validator::default().validate(schema, &value)?;
    Ok(value)
}

/// For application code that wants to `?` a rejection into `anyhow`.
pub fn ensure_valid<'v>(schema: &Schema, value: &'v Value) -> anyhow::Result<&'v Value> {
    Ok(validate(schema, value)?)
}

// ------------------------------- Tests ------------------------------------ //
