//! Schema documents: the JSON form of a schema tree, for callers that
//! cannot build one with the combinators (the CLI).
//!
//! Each node carries a `"type"` tag named after its combinator:
//!
//! ```json
//! { "type": "array", "values": { "type": "object", "properties": [
//!     { "type": "property", "key": "id", "schema": { "type": "number" } },
//!     { "type": "optionalProperty", "key": "tags",
//!       "schema": { "type": "array", "values": [
//!           { "type": "index", "index": 0, "schema": { "type": "string" } } ] } }
//! ] } }
//! ```
//!
//! Loading only; schemas are never written back out.
use std::path::{Path, PathBuf};
use serde::Deserialize;
use thiserror::Error;

use crate::path_de::{from_slice_with_path, from_str_with_path, PathError};
use crate::schema::{self, Schema};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read schema file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed schema at JSON path {path} → {message}")]
    Malformed { path: String, message: String },
}

impl From<PathError> for LoadError {
    fn from(PathError { path, message }: PathError) -> Self {
        LoadError::Malformed { path, message }
    }
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "camelCase")]
enum SchemaDoc {
    String,
    Number,
    Boolean,
    Null,
    Array { values: ValuesDoc },
    Object { properties: Vec<PropertyDoc> },
    OneOf { schemas: Vec<SchemaDoc> },
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum ValuesDoc {
    Indexed(Vec<IndexDoc>),
    Uniform(Box<SchemaDoc>),
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "camelCase")]
enum IndexDoc {
    Index { index: usize, schema: SchemaDoc },
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "camelCase")]
enum PropertyDoc {
    Property { key: String, schema: SchemaDoc },
    OptionalProperty { key: String, schema: SchemaDoc },
}

impl SchemaDoc {
    fn build(self) -> Schema {
        match self {
            SchemaDoc::String => schema::string(),
            SchemaDoc::Number => schema::number(),
            SchemaDoc::Boolean => schema::boolean(),
            SchemaDoc::Null => schema::null(),
            SchemaDoc::Array { values: ValuesDoc::Uniform(item) } => {
                schema::array((*item).build())
            }
            SchemaDoc::Array { values: ValuesDoc::Indexed(entries) } => {
                schema::indexed(
                    entries
                        .into_iter()
                        .map(|IndexDoc::Index { index, schema }| schema::index(index, schema.build()))
                        .collect(),
                )
            }
            SchemaDoc::Object { properties } => schema::object(
                properties
                    .into_iter()
                    .map(|p| match p {
                        PropertyDoc::Property { key, schema } => schema::property(key, schema.build()),
                        PropertyDoc::OptionalProperty { key, schema } => {
                            schema::optional_property(key, schema.build())
                        }
                    })
                    .collect(),
            ),
            SchemaDoc::OneOf { schemas } => {
                schema::one_of(schemas.into_iter().map(SchemaDoc::build).collect())
            }
        }
    }
}

pub fn parse_schema(src: &str) -> Result<Schema, LoadError> {
    let doc = from_str_with_path::<SchemaDoc>(src)?;
    Ok(doc.build())
}

pub fn load_schema_file(path: impl AsRef<Path>) -> Result<Schema, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = from_slice_with_path::<SchemaDoc>(&bytes)?;
    Ok(doc.build())
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    #[test]
    fn parses_every_node_kind() {
        let src = r#"{
            "type": "object",
            "properties": [
                { "type": "property", "key": "id", "schema": { "type": "number" } },
                { "type": "optionalProperty", "key": "name", "schema": { "type": "string" } },
                { "type": "property", "key": "flags", "schema": { "type": "array", "values": { "type": "boolean" } } },
                { "type": "property", "key": "pair", "schema": { "type": "array", "values": [
                    { "type": "index", "index": 1, "schema": { "type": "null" } }
                ] } },
                { "type": "property", "key": "v", "schema": { "type": "oneOf", "schemas": [
                    { "type": "number" }, { "type": "string" }
                ] } }
            ]
        }"#;
        let expected = object(vec![
            property("id", number()),
            optional_property("name", string()),
            property("flags", array(boolean())),
            property("pair", array(vec![index(1, null())])),
            property("v", one_of(vec![number(), string()])),
        ]);
        assert_eq!(parse_schema(src).unwrap(), expected);
    }

    #[test]
    fn empty_values_list_is_indexed() {
        let s = parse_schema(r#"{ "type": "array", "values": [] }"#).unwrap();
        assert_eq!(s, indexed(vec![]));
    }

    #[test]
    fn malformed_is_reported() {
        let src = r#"{ "type": "object", "properties": [ { "type": "property", "key": 5, "schema": { "type": "number" } } ] }"#;
        match parse_schema(src) {
            Err(err @ LoadError::Malformed { .. }) => {
                assert!(err.to_string().starts_with("malformed schema at JSON path"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(matches!(
            parse_schema(r#"{ "type": "integer" }"#),
            Err(LoadError::Malformed { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_schema_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
