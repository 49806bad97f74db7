//! Validation failures.
//!
//! The `Display` output of [`ValidationError`] is the diagnostic callers and
//! logs match on, so each variant's wording is fixed. Context variants wrap
//! the failure of a child and are added by the parent as the recursion
//! unwinds. Rendered values are stored as text so the error owns nothing
//! borrowed from the input.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("expected {value} to be of type {expected}")]
    TypeMismatch { value: String, expected: String },

    #[error("expected {object} to have a property {key}")]
    MissingProperty { object: String, key: String },

    #[error("{cause}, for property {key} of {object}")]
    InProperty { cause: Box<ValidationError>, key: String, object: String },

    #[error("{cause}, or nothing, for property {key} of {object}")]
    InOptionalProperty { cause: Box<ValidationError>, key: String, object: String },

    #[error("{cause}, at index {index} of {array}")]
    AtIndex { cause: Box<ValidationError>, index: usize, array: String },

    /// Every alternative of a union failed; one entry per alternative, in order.
    #[error("{}", join_alternatives(.0))]
    NoAlternativeMatched(Vec<ValidationError>),

    #[error("schema nesting exceeds the maximum depth of {limit}")]
    TooDeep { limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Also covers an index past the end of the input (`undefined`).
    TypeMismatch,
    MissingRequiredProperty,
    UnionExhausted,
    TooDeep,
}

fn join_alternatives(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", or ")
}

impl ValidationError {
    /// Category of the innermost failure, looking through context wrappers.
    /// A depth abort inside any union alternative wins over the union.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ValidationError::MissingProperty { .. } => ErrorKind::MissingRequiredProperty,
            ValidationError::InProperty { cause, .. }
            | ValidationError::InOptionalProperty { cause, .. }
            | ValidationError::AtIndex { cause, .. } => cause.kind(),
            ValidationError::NoAlternativeMatched(alternatives) => {
                if alternatives.iter().any(|e| e.kind() == ErrorKind::TooDeep) {
                    ErrorKind::TooDeep
                } else {
                    ErrorKind::UnionExhausted
                }
            }
            ValidationError::TooDeep { .. } => ErrorKind::TooDeep,
        }
    }

    /// JSON pointer to the node where the innermost failure happened.
    /// A missing property points at the object that lacks it; a union
    /// points at the value all alternatives rejected.
    pub fn path(&self) -> String {
        let mut out = String::new();
        let mut cur = self;
        loop {
            match cur {
                ValidationError::InProperty { cause, key, .. }
                | ValidationError::InOptionalProperty { cause, key, .. } => {
                    out.push('/');
                    out.push_str(&escape_pointer_token(&unquote(key)));
                    cur = cause;
                }
                ValidationError::AtIndex { cause, index, .. } => {
                    out.push('/');
                    out.push_str(&index.to_string());
                    cur = cause;
                }
                _ => return out,
            }
        }
    }
}

// keys are stored rendered (quoted JSON strings)
fn unquote(rendered: &str) -> String {
    serde_json::from_str::<String>(rendered).unwrap_or_else(|_| rendered.to_string())
}

fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

// ------------------------------- Tests ------------------------------------ //
