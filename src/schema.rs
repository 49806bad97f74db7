//! Schema tree and the combinators that build it.
//!
//! A schema is built bottom-up once and then only read, so it can be shared
//! across any number of validations (and threads). Nothing here checks the
//! arguments for consistency: duplicate keys or indices are kept as given
//! and evaluated in declaration order.
use std::fmt;
use crate::classify::TypeTag;

#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String,
    Number,
    Boolean,
    Null,
    Array(ArrayMode),
    Object(Vec<Property>),
    OneOf(Vec<Schema>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayMode {
    /// every element against the same schema
    Uniform(Box<Schema>),
    /// only the listed positions, in list order
    Indexed(Vec<IndexEntry>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub index: usize,
    pub schema: Schema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub schema: Schema,
    pub presence: Presence,
}

impl Schema {
    /// The tag an input must classify as, or `None` for a union.
    pub fn declared_type(&self) -> Option<TypeTag> {
        match self {
            Schema::String => Some(TypeTag::String),
            Schema::Number => Some(TypeTag::Number),
            Schema::Boolean => Some(TypeTag::Boolean),
            Schema::Null => Some(TypeTag::Null),
            Schema::Array(_) => Some(TypeTag::Array),
            Schema::Object(_) => Some(TypeTag::Object),
            Schema::OneOf(_) => None,
        }
    }

    /// Nesting depth; a lone primitive is 1.
    pub fn depth(&self) -> usize {
        let children = match self {
            Schema::String | Schema::Number | Schema::Boolean | Schema::Null => 0,
            Schema::Array(ArrayMode::Uniform(item)) => item.depth(),
            Schema::Array(ArrayMode::Indexed(entries)) => {
                entries.iter().map(|e| e.schema.depth()).max().unwrap_or(0)
            }
            Schema::Object(props) => props.iter().map(|p| p.schema.depth()).max().unwrap_or(0),
            Schema::OneOf(alts) => alts.iter().map(Schema::depth).max().unwrap_or(0),
        };
        children + 1
    }
}

impl From<Schema> for ArrayMode {
    fn from(item: Schema) -> Self {
        ArrayMode::Uniform(Box::new(item))
    }
}

impl From<Vec<IndexEntry>> for ArrayMode {
    fn from(entries: Vec<IndexEntry>) -> Self {
        ArrayMode::Indexed(entries)
    }
}

// ------------------------------ Combinators -------------------------------- //

pub fn string() -> Schema { Schema::String }

pub fn number() -> Schema { Schema::Number }

pub fn boolean() -> Schema { Schema::Boolean }

pub fn null() -> Schema { Schema::Null }

/// `array(number())` for a uniform list, `array(vec![index(0, string())])`
/// for position-specific checks.
pub fn array(values: impl Into<ArrayMode>) -> Schema {
    Schema::Array(values.into())
}

/// Same as `array(entries)`; only the listed positions are checked.
pub fn indexed(entries: Vec<IndexEntry>) -> Schema {
    Schema::Array(ArrayMode::Indexed(entries))
}

pub fn index(index: usize, schema: Schema) -> IndexEntry {
    IndexEntry { index, schema }
}

pub fn object(properties: Vec<Property>) -> Schema {
    Schema::Object(properties)
}

pub fn property(key: impl Into<String>, schema: Schema) -> Property {
    Property { key: key.into(), schema, presence: Presence::Required }
}

pub fn optional_property(key: impl Into<String>, schema: Schema) -> Property {
    Property { key: key.into(), schema, presence: Presence::Optional }
}

pub fn one_of(schemas: Vec<Schema>) -> Schema {
    Schema::OneOf(schemas)
}

// ------------------------------- Display ---------------------------------- //

/// Combinator notation, e.g. `array(object([property("id", number)]))`.
impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::String => f.write_str("string"),
            Schema::Number => f.write_str("number"),
            Schema::Boolean => f.write_str("boolean"),
            Schema::Null => f.write_str("null"),
            Schema::Array(ArrayMode::Uniform(item)) => write!(f, "array({item})"),
            Schema::Array(ArrayMode::Indexed(entries)) => {
                f.write_str("array([")?;
                for (i, e) in entries.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "index({}, {})", e.index, e.schema)?;
                }
                f.write_str("])")
            }
            Schema::Object(props) => {
                f.write_str("object([")?;
                for (i, p) in props.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    let name = match p.presence {
                        Presence::Required => "property",
                        Presence::Optional => "optional_property",
                    };
                    write!(f, "{name}({}, {})", crate::render::render_key(&p.key), p.schema)?;
                }
                f.write_str("])")
            }
            Schema::OneOf(alts) => {
                f.write_str("one_of([")?;
                for (i, s) in alts.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "{s}")?;
                }
                f.write_str("])")
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_accepts_either_mode() {
        assert_eq!(array(number()), Schema::Array(ArrayMode::Uniform(Box::new(Schema::Number))));
        let positional = array(vec![index(2, string()), index(0, null())]);
        match &positional {
            Schema::Array(ArrayMode::Indexed(entries)) => {
                // declaration order kept, not sorted
                assert_eq!(entries[0].index, 2);
                assert_eq!(entries[1].index, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(indexed(vec![index(2, string()), index(0, null())]), positional);
        assert_eq!(indexed(vec![]), Schema::Array(ArrayMode::Indexed(vec![])));
    }

    #[test]
    fn duplicate_keys_are_kept() {
        let s = object(vec![property("a", number()), optional_property("a", string())]);
        let Schema::Object(props) = s else { panic!("not an object") };
        assert_eq!(props.len(), 2);
        assert_eq!(props[1].presence, Presence::Optional);
    }

    #[test]
    fn depth_counts_nesting() {
        assert_eq!(string().depth(), 1);
        assert_eq!(array(array(number())).depth(), 3);
        let s = object(vec![
            property("a", number()),
            property("b", one_of(vec![null(), array(vec![index(0, boolean())])])),
        ]);
        assert_eq!(s.depth(), 4);
        assert_eq!(one_of(vec![]).depth(), 1);
    }

    #[test]
    fn declared_types() {
        assert_eq!(object(vec![]).declared_type(), Some(TypeTag::Object));
        assert_eq!(one_of(vec![number()]).declared_type(), None);
    }

    #[test]
    fn displays_as_combinators() {
        let s = array(object(vec![
            property("id", number()),
            optional_property("tags", array(vec![index(0, string())])),
            property("v", one_of(vec![null(), boolean()])),
        ]));
        assert_eq!(
            s.to_string(),
            "array(object([property(\"id\", number), optional_property(\"tags\", array([index(0, string)])), property(\"v\", one_of([null, boolean]))]))"
        );
    }
}
