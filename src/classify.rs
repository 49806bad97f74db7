//! Type classification for parsed JSON values.
//!
//! Every comparison the validator makes between a declared schema type and
//! an input goes through [`classify`]. An absent value (an array slot past
//! the end) is `None` and gets its own tag so messages can still name it.
use std::fmt;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    Null,
    Array,
    Object,
    Undefined,
}

impl TypeTag {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            TypeTag::Null => "null",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
            TypeTag::Undefined => "undefined",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Null is checked before anything composite, so it never reads as an object.
pub fn classify(value: Option<&Value>) -> TypeTag {
    match value {
        None => TypeTag::Undefined,
        Some(Value::Null) => TypeTag::Null,
        Some(Value::Array(_)) => TypeTag::Array,
        Some(Value::String(_)) => TypeTag::String,
        Some(Value::Number(_)) => TypeTag::Number,
        Some(Value::Bool(_)) => TypeTag::Boolean,
        Some(Value::Object(_)) => TypeTag::Object,
    }
}

// ------------------------------- Tests ------------------------------------ //
