//! JSON rendering of values with `JSON.stringify` semantics.
//!
//! Own enumerable properties are written in insertion order. `undefined`
//! and functions are skipped inside objects and become `null` inside
//! arrays; non-finite numbers become `null`. Cycles are detected instead of
//! recursing forever.

use crate::error::SerializationError;
use probe_types::{ObjectRef, Value};
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};

/// Deepest object nesting the serializer follows.
pub const MAX_DEPTH: usize = 256;

/// Convert a value to a JSON tree.
///
/// Returns `Ok(None)` where `JSON.stringify` would return `undefined`
/// (top-level `undefined` or function).
pub fn to_json(value: &Value) -> Result<Option<serde_json::Value>, SerializationError> {
    Converter::default().convert(value)
}

/// Serialize a value to JSON text, indented by `indent` when non-empty.
pub fn stringify(value: &Value, indent: &str) -> Result<Option<String>, SerializationError> {
    let Some(tree) = to_json(value)? else {
        return Ok(None);
    };
    let text = if indent.is_empty() {
        write_with(&tree, CompactFormatter)
    } else {
        write_with(&tree, PrettyFormatter::with_indent(indent.as_bytes()))
    };
    Ok(Some(text))
}

fn write_with<F: Formatter>(tree: &serde_json::Value, formatter: F) -> String {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    // Writing a `serde_json::Value` into a Vec cannot fail.
    if tree.serialize(&mut ser).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}

#[derive(Default)]
struct Converter {
    /// Objects currently being serialized, outermost first.
    stack: Vec<usize>,
}

impl Converter {
    fn convert(&mut self, value: &Value) -> Result<Option<serde_json::Value>, SerializationError> {
        Ok(Some(match value {
            Value::Undefined => return Ok(None),
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Object(obj) if obj.is_function() => return Ok(None),
            Value::Object(obj) => self.convert_object(obj)?,
        }))
    }

    fn convert_object(&mut self, obj: &ObjectRef) -> Result<serde_json::Value, SerializationError> {
        if self.stack.contains(&obj.id()) {
            return Err(SerializationError::Circular);
        }
        if self.stack.len() >= MAX_DEPTH {
            return Err(SerializationError::TooDeep(MAX_DEPTH));
        }
        self.stack.push(obj.id());

        let result = if obj.is_array() {
            obj.elements()
                .iter()
                .map(|el| Ok(self.convert(el)?.unwrap_or(serde_json::Value::Null)))
                .collect::<Result<Vec<_>, _>>()
                .map(serde_json::Value::Array)
        } else {
            let mut map = serde_json::Map::new();
            for (key, val) in obj.own_enumerable_entries() {
                if let Some(converted) = self.convert(&val)? {
                    map.insert(key, converted);
                }
            }
            Ok(serde_json::Value::Object(map))
        };

        self.stack.pop();
        result
    }
}

/// Integral numbers are written without a fractional part.
fn number(n: f64) -> serde_json::Value {
    if !n.is_finite() {
        return serde_json::Value::Null;
    }
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact(value: &Value) -> String {
        stringify(value, "").expect("serializable").expect("defined")
    }

    #[test]
    fn test_primitives() {
        assert_eq!(compact(&Value::Number(2.0)), "2");
        assert_eq!(compact(&Value::Number(-0.0)), "0");
        assert_eq!(compact(&Value::Number(1.5)), "1.5");
        assert_eq!(compact(&Value::Number(f64::NAN)), "null");
        assert_eq!(compact(&Value::string("a\"b")), r#""a\"b""#);
        assert_eq!(compact(&Value::Null), "null");
        assert_eq!(stringify(&Value::Undefined, ""), Ok(None));
    }

    #[test]
    fn test_object_skips_functions_and_undefined() {
        let obj = ObjectRef::new()
            .with("b", 1)
            .with("a", Value::Undefined)
            .with("f", ObjectRef::function("f", 0, |_, _| Ok(Value::Null)))
            .with("c", "x");
        assert_eq!(compact(&Value::Object(obj)), r#"{"b":1,"c":"x"}"#);
    }

    #[test]
    fn test_array_nulls_functions_and_undefined() {
        let arr = Value::array(vec![
            Value::Undefined,
            Value::Object(ObjectRef::function("f", 0, |_, _| Ok(Value::Null))),
            Value::Bool(true),
        ]);
        assert_eq!(compact(&arr), "[null,null,true]");
    }

    #[test]
    fn test_inherited_properties_are_not_written() {
        let proto = ObjectRef::new().with("inherited", 1);
        let obj = ObjectRef::with_prototype(Some(proto)).with("own", 2);
        assert_eq!(compact(&Value::Object(obj)), r#"{"own":2}"#);
    }

    #[test]
    fn test_cycle_detected() {
        let obj = ObjectRef::new();
        obj.set("self", obj.clone());
        assert_eq!(
            stringify(&Value::Object(obj), ""),
            Err(SerializationError::Circular)
        );
    }

    #[test]
    fn test_shared_reference_is_not_a_cycle() {
        let shared = ObjectRef::new().with("x", 1);
        let obj = ObjectRef::new()
            .with("a", shared.clone())
            .with("b", shared);
        assert_eq!(
            compact(&Value::Object(obj)),
            r#"{"a":{"x":1},"b":{"x":1}}"#
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut value = Value::Null;
        for _ in 0..MAX_DEPTH + 1 {
            value = Value::array(vec![value]);
        }
        assert_eq!(
            stringify(&value, ""),
            Err(SerializationError::TooDeep(MAX_DEPTH))
        );
    }

    #[test]
    fn test_pretty_indent() {
        let obj = ObjectRef::new().with("a", 1);
        let text = stringify(&Value::Object(obj), "  ").expect("ok").expect("defined");
        assert_eq!(text, "{\n  \"a\": 1\n}");
    }
}
