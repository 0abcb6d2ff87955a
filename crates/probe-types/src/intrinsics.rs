//! Built-in prototypes shared by every object in a thread.
//!
//! `Object.prototype` carries the double-underscore members that the
//! explorer hides unless prototype members are requested.

use crate::value::PROTO_KEY;
use crate::{Completion, NativeFunction, ObjectKind, ObjectRef, ThrownError, Value};
use std::cell::RefCell;

thread_local! {
    static INTRINSICS: Intrinsics = Intrinsics::build();
}

/// The intrinsic prototype objects.
#[derive(Debug, Clone)]
pub struct Intrinsics {
    object_prototype: ObjectRef,
    function_prototype: ObjectRef,
    array_prototype: ObjectRef,
    string_prototype: ObjectRef,
    number_prototype: ObjectRef,
    boolean_prototype: ObjectRef,
}

impl Intrinsics {
    pub fn object_prototype() -> ObjectRef {
        INTRINSICS.with(|i| i.object_prototype.clone())
    }

    pub fn function_prototype() -> ObjectRef {
        INTRINSICS.with(|i| i.function_prototype.clone())
    }

    pub fn array_prototype() -> ObjectRef {
        INTRINSICS.with(|i| i.array_prototype.clone())
    }

    pub fn string_prototype() -> ObjectRef {
        INTRINSICS.with(|i| i.string_prototype.clone())
    }

    pub fn number_prototype() -> ObjectRef {
        INTRINSICS.with(|i| i.number_prototype.clone())
    }

    pub fn boolean_prototype() -> ObjectRef {
        INTRINSICS.with(|i| i.boolean_prototype.clone())
    }

    fn build() -> Self {
        // Intrinsic objects are wired with explicit prototypes: the public
        // constructors read this thread-local, which is not ready yet.
        let object_prototype = ObjectRef::from_parts(ObjectKind::Ordinary, None);
        let function_prototype = ObjectRef::from_parts(
            ObjectKind::Function(NativeFunction::new("", 0, |_, _| Ok(Value::Undefined))),
            Some(object_prototype.clone()),
        );
        let array_prototype = ObjectRef::from_parts(
            ObjectKind::Array(RefCell::new(Vec::new())),
            Some(object_prototype.clone()),
        );
        let string_prototype =
            ObjectRef::from_parts(ObjectKind::Ordinary, Some(object_prototype.clone()));
        string_prototype.set("length", 0);
        let number_prototype =
            ObjectRef::from_parts(ObjectKind::Ordinary, Some(object_prototype.clone()));
        let boolean_prototype =
            ObjectRef::from_parts(ObjectKind::Ordinary, Some(object_prototype.clone()));

        let methods = Methods {
            function_prototype: &function_prototype,
        };
        methods.install_object(&object_prototype);
        methods.install_function(&function_prototype);
        methods.install_array(&array_prototype);
        methods.install_string(&string_prototype);
        methods.install_number(&number_prototype);
        methods.install_boolean(&boolean_prototype);

        Self {
            object_prototype,
            function_prototype,
            array_prototype,
            string_prototype,
            number_prototype,
            boolean_prototype,
        }
    }
}

struct Methods<'a> {
    function_prototype: &'a ObjectRef,
}

impl Methods<'_> {
    fn define<F>(&self, target: &ObjectRef, name: &str, arity: u32, callback: F)
    where
        F: Fn(&Value, &[Value]) -> Completion<Value> + 'static,
    {
        let function = ObjectRef::from_parts(
            ObjectKind::Function(NativeFunction::new(name, arity, callback)),
            Some(self.function_prototype.clone()),
        );
        target.set(name, function);
    }

    // ── Object.prototype ─────────────────────────────────────────────────

    fn install_object(&self, proto: &ObjectRef) {
        self.define(proto, "__defineGetter__", 2, |_, _| {
            Err(ThrownError::type_error("accessor properties are not supported"))
        });
        self.define(proto, "__defineSetter__", 2, |_, _| {
            Err(ThrownError::type_error("accessor properties are not supported"))
        });
        self.define(proto, "hasOwnProperty", 1, |this, args| {
            let key = key_arg(args);
            Ok(Value::Bool(match this {
                Value::Object(obj) => obj.has_own(&key),
                Value::String(_) => this.own_property_names().contains(&key),
                _ => false,
            }))
        });
        self.define(proto, "__lookupGetter__", 1, |_, _| Ok(Value::Undefined));
        self.define(proto, "__lookupSetter__", 1, |_, _| Ok(Value::Undefined));
        self.define(proto, "isPrototypeOf", 1, |this, args| {
            let (Some(target), Value::Object(candidate)) = (this.as_object(), arg(args, 0)) else {
                return Ok(Value::Bool(false));
            };
            let mut cursor = candidate.prototype();
            while let Some(obj) = cursor {
                if obj.ptr_eq(target) {
                    return Ok(Value::Bool(true));
                }
                cursor = obj.prototype();
            }
            Ok(Value::Bool(false))
        });
        self.define(proto, "propertyIsEnumerable", 1, |this, args| {
            let key = key_arg(args);
            Ok(Value::Bool(
                this.as_object().is_some_and(|obj| obj.is_enumerable_own(&key)),
            ))
        });
        self.define(proto, "toString", 0, |this, _| {
            let tag = match this {
                Value::Undefined => "Undefined",
                Value::Null => "Null",
                Value::Bool(_) => "Boolean",
                Value::Number(_) => "Number",
                Value::String(_) => "String",
                Value::Object(obj) if obj.is_array() => "Array",
                Value::Object(obj) if obj.is_function() => "Function",
                Value::Object(_) => "Object",
            };
            Ok(Value::String(format!("[object {tag}]")))
        });
        self.define(proto, "valueOf", 0, |this, _| Ok(this.clone()));
        // Resolved against the receiver in `ObjectRef::get`.
        proto.set(PROTO_KEY, Value::Null);
        self.define(proto, "toLocaleString", 0, |this, _| {
            Ok(Value::String(this.to_display_string()))
        });
    }

    // ── Function.prototype ───────────────────────────────────────────────

    fn install_function(&self, proto: &ObjectRef) {
        self.define(proto, "apply", 2, |this, args| {
            let function = this_function(this, "apply")?;
            let call_args = match arg(args, 1) {
                Value::Object(list) if list.is_array() => list.elements(),
                v if v.is_nullish() => Vec::new(),
                _ => {
                    return Err(ThrownError::type_error(
                        "CreateListFromArrayLike called on non-object",
                    ))
                }
            };
            function.call(&arg(args, 0), &call_args)
        });
        self.define(proto, "call", 1, |this, args| {
            let function = this_function(this, "call")?;
            function.call(&arg(args, 0), args.get(1..).unwrap_or_default())
        });
        self.define(proto, "toString", 0, |this, _| {
            this_function(this, "toString")?;
            Ok(Value::String(this.to_display_string()))
        });
    }

    // ── Array.prototype ──────────────────────────────────────────────────

    fn install_array(&self, proto: &ObjectRef) {
        self.define(proto, "at", 1, |this, args| {
            let elements = this_array(this, "at")?;
            let len = elements.len() as f64;
            let n = integer_arg(args, 0);
            let idx = if n < 0.0 { len + n } else { n };
            if idx < 0.0 || idx >= len {
                return Ok(Value::Undefined);
            }
            Ok(elements[idx as usize].clone())
        });
        self.define(proto, "concat", 1, |this, args| {
            let mut elements = this_array(this, "concat")?;
            for value in args {
                match value {
                    Value::Object(obj) if obj.is_array() => elements.extend(obj.elements()),
                    other => elements.push(other.clone()),
                }
            }
            Ok(Value::array(elements))
        });
        self.define(proto, "includes", 1, |this, args| {
            let needle = arg(args, 0);
            Ok(Value::Bool(
                this_array(this, "includes")?.iter().any(|v| *v == needle),
            ))
        });
        self.define(proto, "indexOf", 1, |this, args| {
            let needle = arg(args, 0);
            let position = this_array(this, "indexOf")?
                .iter()
                .position(|v| v.strict_equals(&needle));
            Ok(position.map_or(Value::Number(-1.0), Value::from))
        });
        self.define(proto, "join", 1, |this, args| {
            let Some(array) = this.as_object().filter(|obj| obj.is_array()) else {
                return Err(non_array("join"));
            };
            let separator = match arg(args, 0) {
                Value::Undefined => ",".to_string(),
                other => other.to_display_string(),
            };
            Ok(Value::String(array.join_elements(&separator, &mut vec![array.id()])))
        });
        self.define(proto, "slice", 2, |this, args| {
            let elements = this_array(this, "slice")?;
            let (start, end) = slice_bounds(args, elements.len());
            Ok(Value::array(elements[start..end.max(start)].to_vec()))
        });
        self.define(proto, "toString", 0, |this, _| {
            this_array(this, "toString")?;
            Ok(Value::String(this.to_display_string()))
        });
    }

    // ── String.prototype ─────────────────────────────────────────────────

    fn install_string(&self, proto: &ObjectRef) {
        self.define(proto, "charAt", 1, |this, args| {
            let s = this_string(this, "charAt")?;
            let idx = integer_arg(args, 0);
            let c = if idx < 0.0 { None } else { s.chars().nth(idx as usize) };
            Ok(Value::String(c.map(String::from).unwrap_or_default()))
        });
        self.define(proto, "endsWith", 1, |this, args| {
            let s = this_string(this, "endsWith")?;
            Ok(Value::Bool(s.ends_with(&arg(args, 0).to_display_string())))
        });
        self.define(proto, "includes", 1, |this, args| {
            let s = this_string(this, "includes")?;
            Ok(Value::Bool(s.contains(&arg(args, 0).to_display_string())))
        });
        self.define(proto, "indexOf", 1, |this, args| {
            let s = this_string(this, "indexOf")?;
            let needle = arg(args, 0).to_display_string();
            Ok(match s.find(&needle) {
                Some(byte_idx) => Value::from(s[..byte_idx].chars().count()),
                None => Value::Number(-1.0),
            })
        });
        self.define(proto, "slice", 2, |this, args| {
            let chars: Vec<char> = this_string(this, "slice")?.chars().collect();
            let (start, end) = slice_bounds(args, chars.len());
            Ok(Value::String(chars[start..end.max(start)].iter().collect()))
        });
        self.define(proto, "split", 2, |this, args| {
            let s = this_string(this, "split")?;
            let limit = match arg(args, 1) {
                Value::Undefined => usize::MAX,
                v => v.to_number().max(0.0) as usize,
            };
            let parts: Vec<Value> = match arg(args, 0) {
                Value::Undefined => vec![Value::String(s)],
                sep => {
                    let sep = sep.to_display_string();
                    if sep.is_empty() {
                        s.chars().map(|c| Value::String(c.to_string())).collect()
                    } else {
                        s.split(sep.as_str()).map(Value::from).collect()
                    }
                }
            };
            Ok(Value::array(parts.into_iter().take(limit).collect()))
        });
        self.define(proto, "startsWith", 1, |this, args| {
            let s = this_string(this, "startsWith")?;
            Ok(Value::Bool(s.starts_with(&arg(args, 0).to_display_string())))
        });
        self.define(proto, "toLowerCase", 0, |this, _| {
            Ok(Value::String(this_string(this, "toLowerCase")?.to_lowercase()))
        });
        self.define(proto, "toString", 0, |this, _| {
            Ok(Value::String(this_string(this, "toString")?))
        });
        self.define(proto, "toUpperCase", 0, |this, _| {
            Ok(Value::String(this_string(this, "toUpperCase")?.to_uppercase()))
        });
        self.define(proto, "trim", 0, |this, _| {
            Ok(Value::String(this_string(this, "trim")?.trim().to_string()))
        });
    }

    // ── Number.prototype / Boolean.prototype ─────────────────────────────

    fn install_number(&self, proto: &ObjectRef) {
        self.define(proto, "toFixed", 1, |this, args| {
            let Value::Number(n) = this else {
                return Err(ThrownError::type_error(
                    "Number.prototype.toFixed requires that 'this' be a Number",
                ));
            };
            let digits = integer_arg(args, 0);
            if !(0.0..=100.0).contains(&digits) {
                return Err(ThrownError::range_error(
                    "toFixed() digits argument must be between 0 and 100",
                ));
            }
            if !n.is_finite() {
                return Ok(Value::String(crate::format_number(*n)));
            }
            Ok(Value::String(format!("{:.*}", digits as usize, n)))
        });
        self.define(proto, "toString", 0, |this, _| match this {
            Value::Number(n) => Ok(Value::String(crate::format_number(*n))),
            _ => Err(ThrownError::type_error(
                "Number.prototype.toString requires that 'this' be a Number",
            )),
        });
        self.define(proto, "valueOf", 0, |this, _| Ok(this.clone()));
    }

    fn install_boolean(&self, proto: &ObjectRef) {
        self.define(proto, "toString", 0, |this, _| match this {
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err(ThrownError::type_error(
                "Boolean.prototype.toString requires that 'this' be a Boolean",
            )),
        });
        self.define(proto, "valueOf", 0, |this, _| Ok(this.clone()));
    }
}

// ── Argument helpers ─────────────────────────────────────────────────────

fn arg(args: &[Value], idx: usize) -> Value {
    args.get(idx).cloned().unwrap_or_default()
}

fn key_arg(args: &[Value]) -> String {
    arg(args, 0).to_display_string()
}

/// ToIntegerOrInfinity with `NaN` mapped to zero.
fn integer_arg(args: &[Value], idx: usize) -> f64 {
    let n = arg(args, idx).to_number();
    if n.is_nan() {
        0.0
    } else {
        n.trunc()
    }
}

fn relative_index(value: &Value, len: usize, default: usize) -> usize {
    if matches!(value, Value::Undefined) {
        return default;
    }
    let n = value.to_number();
    let n = if n.is_nan() { 0.0 } else { n.trunc() };
    let len = len as f64;
    if n < 0.0 {
        (len + n).max(0.0) as usize
    } else {
        n.min(len) as usize
    }
}

fn slice_bounds(args: &[Value], len: usize) -> (usize, usize) {
    (
        relative_index(&arg(args, 0), len, 0),
        relative_index(&arg(args, 1), len, len),
    )
}

fn non_array(method: &str) -> ThrownError {
    ThrownError::type_error(format!("Array.prototype.{method} called on non-array"))
}

fn this_array(this: &Value, method: &str) -> Completion<Vec<Value>> {
    match this {
        Value::Object(obj) if obj.is_array() => Ok(obj.elements()),
        _ => Err(non_array(method)),
    }
}

fn this_string(this: &Value, method: &str) -> Completion<String> {
    match this {
        Value::String(s) => Ok(s.clone()),
        _ => Err(ThrownError::type_error(format!(
            "String.prototype.{method} requires that 'this' be a String"
        ))),
    }
}

fn this_function(this: &Value, method: &str) -> Completion<NativeFunction> {
    this.as_object()
        .and_then(ObjectRef::as_function)
        .cloned()
        .ok_or_else(|| {
            ThrownError::type_error(format!(
                "Function.prototype.{method} called on a non-function"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(receiver: Value, name: &str, args: &[Value]) -> Completion<Value> {
        let method = receiver.get_property(name)?;
        let function = method
            .as_object()
            .and_then(ObjectRef::as_function)
            .cloned()
            .unwrap_or_else(|| panic!("{name} is not a function"));
        function.call(&receiver, args)
    }

    #[test]
    fn test_object_prototype_member_order() {
        let names = Intrinsics::object_prototype().own_property_names();
        assert_eq!(
            names,
            vec![
                "__defineGetter__",
                "__defineSetter__",
                "hasOwnProperty",
                "__lookupGetter__",
                "__lookupSetter__",
                "isPrototypeOf",
                "propertyIsEnumerable",
                "toString",
                "valueOf",
                "__proto__",
                "toLocaleString",
            ]
        );
    }

    #[test]
    fn test_prototypes_chain_to_object_prototype() {
        let object_proto = Intrinsics::object_prototype();
        for proto in [
            Intrinsics::function_prototype(),
            Intrinsics::array_prototype(),
            Intrinsics::string_prototype(),
            Intrinsics::number_prototype(),
            Intrinsics::boolean_prototype(),
        ] {
            assert!(proto.prototype().is_some_and(|p| p.ptr_eq(&object_proto)));
        }
        assert!(object_proto.prototype().is_none());
    }

    #[test]
    fn test_array_prototype_is_an_empty_array() {
        let proto = Intrinsics::array_prototype();
        assert_eq!(proto.array_len(), Some(0));
        assert!(proto.own_property_names().contains(&"length".to_string()));
    }

    #[test]
    fn test_has_own_property() {
        let obj = Value::from(ObjectRef::new().with("a", 1));
        assert_eq!(call(obj.clone(), "hasOwnProperty", &[Value::from("a")]).unwrap(), Value::from(true));
        assert_eq!(call(obj, "hasOwnProperty", &[Value::from("toString")]).unwrap(), Value::from(false));
    }

    #[test]
    fn test_object_to_string_tags() {
        let arr = Value::array(vec![]);
        assert_eq!(
            call(Value::from(ObjectRef::new()), "toString", &[]).unwrap(),
            Value::from("[object Object]")
        );
        let to_string = Intrinsics::object_prototype().get("toString", &Value::Undefined);
        let f = to_string.as_object().and_then(ObjectRef::as_function).cloned().unwrap();
        assert_eq!(f.call(&arr, &[]).unwrap(), Value::from("[object Array]"));
    }

    #[test]
    fn test_array_methods() {
        let arr = Value::array(vec![Value::from(1), Value::from(2), Value::from(3)]);
        assert_eq!(call(arr.clone(), "join", &[Value::from("-")]).unwrap(), Value::from("1-2-3"));
        assert_eq!(call(arr.clone(), "indexOf", &[Value::from(3)]).unwrap(), Value::from(2));
        assert_eq!(call(arr.clone(), "indexOf", &[Value::from(9)]).unwrap(), Value::from(-1));
        assert_eq!(call(arr.clone(), "includes", &[Value::from(2)]).unwrap(), Value::from(true));
        assert_eq!(call(arr.clone(), "at", &[Value::from(-1)]).unwrap(), Value::from(3));
        let sliced = call(arr.clone(), "slice", &[Value::from(1)]).unwrap();
        assert_eq!(sliced.to_display_string(), "2,3");
        let joined = call(arr, "concat", &[Value::array(vec![Value::from(4)]), Value::from(5)]).unwrap();
        assert_eq!(joined.to_display_string(), "1,2,3,4,5");
    }

    #[test]
    fn test_array_method_on_non_array_throws() {
        let join = Intrinsics::array_prototype().get("join", &Value::Undefined);
        let f = join.as_object().and_then(ObjectRef::as_function).cloned().unwrap();
        let err = f.call(&Value::from(1), &[]).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: Array.prototype.join called on non-array");
    }

    #[test]
    fn test_string_methods() {
        let s = Value::from("  Hello World  ");
        assert_eq!(call(s.clone(), "trim", &[]).unwrap(), Value::from("Hello World"));
        let trimmed = Value::from("Hello World");
        assert_eq!(call(trimmed.clone(), "toUpperCase", &[]).unwrap(), Value::from("HELLO WORLD"));
        assert_eq!(call(trimmed.clone(), "indexOf", &[Value::from("World")]).unwrap(), Value::from(6));
        assert_eq!(call(trimmed.clone(), "slice", &[Value::from(-5)]).unwrap(), Value::from("World"));
        assert_eq!(call(trimmed.clone(), "startsWith", &[Value::from("He")]).unwrap(), Value::from(true));
        let parts = call(trimmed, "split", &[Value::from(" ")]).unwrap();
        assert_eq!(parts.type_tag(), "object:array(2)");
    }

    #[test]
    fn test_number_to_fixed() {
        assert_eq!(call(Value::from(3.14159), "toFixed", &[Value::from(2)]).unwrap(), Value::from("3.14"));
        let err = call(Value::from(1), "toFixed", &[Value::from(101)]).unwrap_err();
        assert_eq!(err.kind, crate::ErrorKind::RangeError);
    }

    #[test]
    fn test_function_call_binds_this() {
        let f = Value::from(ObjectRef::function("self", 0, |this, _| Ok(this.clone())));
        let result = call(f, "call", &[Value::from("bound")]).unwrap();
        assert_eq!(result, Value::from("bound"));
    }
}
