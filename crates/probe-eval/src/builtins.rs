//! Built-in globals: `undefined`, `NaN`, `Infinity`, `Math`, `JSON`, `Object`.

use crate::env::Environment;
use crate::json;
use probe_types::{Completion, ObjectRef, ThrownError, Value};

/// Install every built-in global into `env`.
pub fn install(env: &mut Environment) {
    env.define("undefined", Value::Undefined);
    env.define("NaN", Value::Number(f64::NAN));
    env.define("Infinity", Value::Number(f64::INFINITY));
    env.define("Math", Value::Object(math()));
    env.define("JSON", Value::Object(json_object()));
    env.define("Object", Value::Object(object_constructor()));
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

fn num_arg(args: &[Value], index: usize) -> f64 {
    arg(args, index).to_number()
}

// ══════════════════════════════════════════════════════════════════════════════
// Math
// ══════════════════════════════════════════════════════════════════════════════

fn unary_math(name: &'static str, op: fn(f64) -> f64) -> ObjectRef {
    ObjectRef::function(name, 1, move |_, args| Ok(Value::Number(op(num_arg(args, 0)))))
}

/// `Math.round`: halves round towards positive infinity.
fn js_round(n: f64) -> f64 {
    if !n.is_finite() || n.fract() == 0.0 {
        return n;
    }
    (n + 0.5).floor()
}

fn math() -> ObjectRef {
    let math = ObjectRef::new()
        .with("E", std::f64::consts::E)
        .with("PI", std::f64::consts::PI)
        .with("abs", unary_math("abs", f64::abs))
        .with("ceil", unary_math("ceil", f64::ceil))
        .with("floor", unary_math("floor", f64::floor))
        .with("round", unary_math("round", js_round))
        .with("sqrt", unary_math("sqrt", f64::sqrt));
    math.set(
        "max",
        ObjectRef::function("max", 2, |_, args| {
            Ok(Value::Number(fold_numbers(args, f64::NEG_INFINITY, f64::max)))
        }),
    );
    math.set(
        "min",
        ObjectRef::function("min", 2, |_, args| {
            Ok(Value::Number(fold_numbers(args, f64::INFINITY, f64::min)))
        }),
    );
    math.set(
        "pow",
        ObjectRef::function("pow", 2, |_, args| {
            Ok(Value::Number(num_arg(args, 0).powf(num_arg(args, 1))))
        }),
    );
    math
}

/// Fold arguments with `op`; any `NaN` argument makes the result `NaN`.
fn fold_numbers(args: &[Value], init: f64, op: fn(f64, f64) -> f64) -> f64 {
    let mut acc = init;
    for n in args.iter().map(Value::to_number) {
        if n.is_nan() {
            return f64::NAN;
        }
        acc = op(acc, n);
    }
    acc
}

// ══════════════════════════════════════════════════════════════════════════════
// JSON
// ══════════════════════════════════════════════════════════════════════════════

fn json_object() -> ObjectRef {
    ObjectRef::new().with(
        "stringify",
        ObjectRef::function("stringify", 3, |_, args| {
            let indent = indent_arg(&arg(args, 2));
            match json::stringify(&arg(args, 0), &indent)? {
                Some(text) => Ok(Value::String(text)),
                None => Ok(Value::Undefined),
            }
        }),
    )
}

/// The `space` argument: a count of spaces (capped at 10) or a string
/// prefix (truncated to 10 characters).
fn indent_arg(space: &Value) -> String {
    match space {
        Value::Number(n) if *n >= 1.0 => " ".repeat(n.min(10.0) as usize),
        Value::String(s) => s.chars().take(10).collect(),
        _ => String::new(),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Object
// ══════════════════════════════════════════════════════════════════════════════

fn require_object_coercible(value: &Value) -> Completion<()> {
    if value.is_nullish() {
        return Err(ThrownError::type_error(
            "Cannot convert undefined or null to object",
        ));
    }
    Ok(())
}

fn object_constructor() -> ObjectRef {
    let object = ObjectRef::function("Object", 1, |_, args| {
        let value = arg(args, 0);
        Ok(match value {
            Value::Object(_) => value,
            _ => Value::Object(ObjectRef::new()),
        })
    });
    object.set(
        "keys",
        ObjectRef::function("keys", 1, |_, args| {
            let target = arg(args, 0);
            require_object_coercible(&target)?;
            let keys = match &target {
                Value::Object(obj) => obj
                    .own_enumerable_entries()
                    .into_iter()
                    .map(|(key, _)| Value::String(key))
                    .collect(),
                Value::String(s) => (0..s.chars().count())
                    .map(|i| Value::String(i.to_string()))
                    .collect(),
                _ => Vec::new(),
            };
            Ok(Value::array(keys))
        }),
    );
    object.set(
        "getOwnPropertyNames",
        ObjectRef::function("getOwnPropertyNames", 1, |_, args| {
            let target = arg(args, 0);
            require_object_coercible(&target)?;
            Ok(Value::array(
                target
                    .own_property_names()
                    .into_iter()
                    .map(Value::String)
                    .collect(),
            ))
        }),
    );
    object.set(
        "getPrototypeOf",
        ObjectRef::function("getPrototypeOf", 1, |_, args| {
            let target = arg(args, 0);
            require_object_coercible(&target)?;
            Ok(target.prototype().map_or(Value::Null, Value::Object))
        }),
    );
    object
}
