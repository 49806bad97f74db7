//! Canonical text forms embedded in validation messages.
use serde::Serialize;
use serde_json::Value;
use crate::classify::TypeTag;

// 2^53: beyond this a float no longer has a single integer spelling
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Pretty-printed with a 2-space indent; strings come out quoted.
/// An absent value has no JSON form and renders as the bare word `undefined`.
pub fn render_value(value: Option<&Value>) -> String {
    match value {
        Some(v) => pretty(&integral_floats_as_integers(v)),
        None => TypeTag::Undefined.as_str().to_string(),
    }
}

/// Same form for the elements of an array, rendered as the array.
pub fn render_items(items: &[Value]) -> String {
    pretty(&items.iter().map(integral_floats_as_integers).collect::<Vec<_>>())
}

fn pretty<T: Serialize + ?Sized>(v: &T) -> String {
    // serializing JSON data to a String cannot fail (keys are always strings)
    serde_json::to_string_pretty(v).unwrap_or_default()
}

/// `1.0` renders as `1`, the way JSON has no separate float spelling for it.
fn integral_floats_as_integers(v: &Value) -> Value {
    match v {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => Value::from(f as i64),
            _ => v.clone(),
        },
        Value::Array(xs) => Value::Array(xs.iter().map(integral_floats_as_integers).collect()),
        Value::Object(m) => Value::Object(
            m.iter().map(|(k, x)| (k.clone(), integral_floats_as_integers(x))).collect(),
        ),
        _ => v.clone(),
    }
}

/// Type names render as JSON string literals, e.g. `"number"`.
pub fn render_tag(tag: TypeTag) -> String {
    render_str(tag.as_str())
}

pub fn render_key(key: &str) -> String {
    render_str(key)
}

fn render_str(s: &str) -> String {
    Value::from(s).to_string()
}

// ------------------------------- Tests ------------------------------------ //
