//! The object graph walked by the explorer and the evaluator.
//!
//! Values follow JavaScript's data model closely enough that property
//! listings, `typeof` tags and string conversions read the way a developer
//! expects: primitives, ordinary objects with ordered own properties,
//! arrays, and native functions, each object with an optional prototype.
//!
//! Objects are reference-counted and interior-mutable so a host can build
//! graphs (including self-referential ones) before handing them over. The
//! explorer and evaluator never mutate them.

use crate::intrinsics::Intrinsics;
use crate::{Completion, ThrownError};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Key under which `Object.prototype` exposes an object's prototype.
pub(crate) const PROTO_KEY: &str = "__proto__";

/// Host callback behind a [`NativeFunction`]: `(this, args) -> result`.
pub type NativeFn = dyn Fn(&Value, &[Value]) -> Completion<Value>;

// ══════════════════════════════════════════════════════════════════════════════
// Value
// ══════════════════════════════════════════════════════════════════════════════

/// A value in the object graph.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(ObjectRef),
}

impl Value {
    /// Build a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Build an array value.
    pub fn array(elements: Vec<Value>) -> Self {
        Self::Object(ObjectRef::array(elements))
    }

    /// Returns `true` for `undefined` and `null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Returns `true` for callable values.
    pub fn is_function(&self) -> bool {
        self.as_object().is_some_and(ObjectRef::is_function)
    }

    /// The `typeof` name of this value.
    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "object",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Object(obj) if obj.is_function() => "function",
            Self::Object(_) => "object",
        }
    }

    /// The type tag shown next to a property: the `typeof` name, except that
    /// arrays report `object:array(N)`.
    pub fn type_tag(&self) -> String {
        match self.as_object().and_then(ObjectRef::array_len) {
            Some(len) => format!("object:array({len})"),
            None => self.type_of().to_string(),
        }
    }

    /// The direct prototype. Primitives report their intrinsic prototype;
    /// `undefined` and `null` have none.
    pub fn prototype(&self) -> Option<ObjectRef> {
        match self {
            Self::Undefined | Self::Null => None,
            Self::Bool(_) => Some(Intrinsics::boolean_prototype()),
            Self::Number(_) => Some(Intrinsics::number_prototype()),
            Self::String(_) => Some(Intrinsics::string_prototype()),
            Self::Object(obj) => obj.prototype(),
        }
    }

    /// Own property names in listing order.
    pub fn own_property_names(&self) -> Vec<String> {
        match self {
            Self::String(s) => (0..s.chars().count())
                .map(|i| i.to_string())
                .chain(std::iter::once("length".to_string()))
                .collect(),
            Self::Object(obj) => obj.own_property_names(),
            _ => Vec::new(),
        }
    }

    /// Read a property, walking the prototype chain.
    ///
    /// Reading from `undefined` or `null` throws a `TypeError`.
    pub fn get_property(&self, key: &str) -> Completion<Value> {
        match self {
            Self::Undefined | Self::Null => Err(ThrownError::type_error(format!(
                "Cannot read properties of {} (reading '{key}')",
                self.to_display_string()
            ))),
            Self::Object(obj) => Ok(obj.get(key, self)),
            Self::String(s) => {
                if let Some(idx) = array_index(key) {
                    return Ok(s
                        .chars()
                        .nth(idx)
                        .map(|c| Value::String(c.to_string()))
                        .unwrap_or_default());
                }
                if key == "length" {
                    return Ok(Value::from(s.chars().count()));
                }
                Ok(Intrinsics::string_prototype().get(key, self))
            }
            Self::Number(_) => Ok(Intrinsics::number_prototype().get(key, self)),
            Self::Bool(_) => Ok(Intrinsics::boolean_prototype().get(key, self)),
        }
    }

    /// JavaScript truthiness.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Object(_) => true,
        }
    }

    /// Numeric conversion (`Number(v)`).
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Undefined => f64::NAN,
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::String(s) => string_to_number(s),
            Self::Object(_) => string_to_number(&self.to_display_string()),
        }
    }

    /// String conversion (`String(v)`).
    pub fn to_display_string(&self) -> String {
        self.to_string_guarded(&mut Vec::new())
    }

    fn to_string_guarded(&self, seen: &mut Vec<usize>) -> String {
        match self {
            Self::Undefined => "undefined".to_string(),
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::String(s) => s.clone(),
            Self::Object(obj) => match obj.kind() {
                ObjectKind::Array(_) => {
                    if seen.contains(&obj.id()) {
                        return String::new();
                    }
                    seen.push(obj.id());
                    let joined = obj.join_elements(",", seen);
                    seen.pop();
                    joined
                }
                ObjectKind::Function(f) => format!("function {}() {{ [native code] }}", f.name()),
                ObjectKind::Ordinary => "[object Object]".to_string(),
            },
        }
    }

    /// Strict equality (`===`).
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Loose equality (`==`).
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if std::mem::discriminant(a) == std::mem::discriminant(b) => a.strict_equals(b),
            (a, b) if a.is_nullish() && b.is_nullish() => true,
            (a, b) if a.is_nullish() || b.is_nullish() => false,
            (Self::Number(n), Self::String(s)) | (Self::String(s), Self::Number(n)) => {
                *n == string_to_number(s)
            }
            (Self::Bool(b), other) | (other, Self::Bool(b)) => {
                Value::Number(f64::from(u8::from(*b))).loose_equals(other)
            }
            (Self::Object(obj), prim) | (prim, Self::Object(obj)) => {
                Value::String(Value::Object(obj.clone()).to_display_string()).loose_equals(prim)
            }
            _ => false,
        }
    }
}

/// SameValueZero: like `===` but `NaN` equals itself.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_equals(other),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Object(obj) => write!(f, "{obj:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Self::Object(obj)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Self::array(elements)
    }
}

/// Format a number the way `String(n)` does: plain decimals between `1e-7`
/// and `1e21`, exponent notation outside, always the shortest digits that
/// round-trip.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        (if n > 0.0 { "Infinity" } else { "-Infinity" }).to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n < 0.0 {
        format!("-{}", format_number(-n))
    } else {
        // `{:e}` yields the shortest digits, e.g. `1.23e-18`.
        let scientific = format!("{n:e}");
        let (mantissa, exponent) = scientific
            .split_once('e')
            .unwrap_or((scientific.as_str(), "0"));
        let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
        let exponent: i32 = exponent.parse().unwrap_or(0);
        place_decimal_point(&digits, exponent + 1)
    }
}

/// Lay out `digits` with the decimal point `point` places from the left.
fn place_decimal_point(digits: &str, point: i32) -> String {
    let len = digits.len() as i32;
    if len <= point && point <= 21 {
        format!("{digits}{}", "0".repeat((point - len) as usize))
    } else if 0 < point && point <= 21 {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{whole}.{fraction}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat((-point) as usize))
    } else {
        let exponent = point - 1;
        let sign = if exponent < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{sign}{}", exponent.abs())
        } else {
            format!("{first}.{rest}e{sign}{}", exponent.abs())
        }
    }
}

fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if hex.is_empty() {
            return f64::NAN;
        }
        return hex
            .chars()
            .try_fold(0.0, |acc: f64, c| c.to_digit(16).map(|d| acc * 16.0 + f64::from(d)))
            .unwrap_or(f64::NAN);
    }
    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}

/// Parse a canonical array index (`"0"`, `"17"`, not `"01"`).
pub(crate) fn array_index(key: &str) -> Option<usize> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if canonical {
        key.parse().ok()
    } else {
        None
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Native functions
// ══════════════════════════════════════════════════════════════════════════════

/// A host-implemented function.
#[derive(Clone)]
pub struct NativeFunction {
    name: String,
    arity: u32,
    callback: Rc<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<String>, arity: u32, callback: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Completion<Value> + 'static,
    {
        Self {
            name: name.into(),
            arity,
            callback: Rc::new(callback),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> u32 {
        self.arity
    }

    /// Invoke the function with `this` bound to `this`.
    pub fn call(&self, this: &Value, args: &[Value]) -> Completion<Value> {
        (self.callback)(this, args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Function: {}]", self.name)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Objects
// ══════════════════════════════════════════════════════════════════════════════

/// What kind of object sits behind an [`ObjectRef`].
#[derive(Debug)]
pub enum ObjectKind {
    Ordinary,
    Array(RefCell<Vec<Value>>),
    Function(NativeFunction),
}

#[derive(Debug)]
struct ObjectData {
    kind: ObjectKind,
    properties: RefCell<IndexMap<String, Value>>,
    prototype: RefCell<Option<ObjectRef>>,
}

/// A shared handle to an object in the graph.
#[derive(Clone)]
pub struct ObjectRef(Rc<ObjectData>);

impl ObjectRef {
    pub(crate) fn from_parts(kind: ObjectKind, prototype: Option<ObjectRef>) -> Self {
        Self(Rc::new(ObjectData {
            kind,
            properties: RefCell::new(IndexMap::new()),
            prototype: RefCell::new(prototype),
        }))
    }

    /// A plain object inheriting from `Object.prototype`.
    pub fn new() -> Self {
        Self::from_parts(ObjectKind::Ordinary, Some(Intrinsics::object_prototype()))
    }

    /// A plain object with an explicit prototype (`None` for a null prototype).
    pub fn with_prototype(prototype: Option<ObjectRef>) -> Self {
        Self::from_parts(ObjectKind::Ordinary, prototype)
    }

    /// An array inheriting from `Array.prototype`.
    pub fn array(elements: Vec<Value>) -> Self {
        Self::from_parts(
            ObjectKind::Array(RefCell::new(elements)),
            Some(Intrinsics::array_prototype()),
        )
    }

    /// A native function inheriting from `Function.prototype`.
    pub fn function<F>(name: impl Into<String>, arity: u32, callback: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Completion<Value> + 'static,
    {
        Self::from_native(NativeFunction::new(name, arity, callback))
    }

    pub fn from_native(function: NativeFunction) -> Self {
        Self::from_parts(
            ObjectKind::Function(function),
            Some(Intrinsics::function_prototype()),
        )
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.0.kind
    }

    pub fn is_array(&self) -> bool {
        matches!(self.0.kind, ObjectKind::Array(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self.0.kind, ObjectKind::Function(_))
    }

    pub fn as_function(&self) -> Option<&NativeFunction> {
        match &self.0.kind {
            ObjectKind::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Length of an array, `None` for other objects.
    pub fn array_len(&self) -> Option<usize> {
        match &self.0.kind {
            ObjectKind::Array(elements) => Some(elements.borrow().len()),
            _ => None,
        }
    }

    /// A snapshot of an array's elements (empty for other objects).
    pub fn elements(&self) -> Vec<Value> {
        match &self.0.kind {
            ObjectKind::Array(elements) => elements.borrow().clone(),
            _ => Vec::new(),
        }
    }

    /// Append to an array. Ignored for other objects.
    pub fn push(&self, value: impl Into<Value>) {
        if let ObjectKind::Array(elements) = &self.0.kind {
            elements.borrow_mut().push(value.into());
        }
    }

    /// Define or overwrite an own property.
    ///
    /// On arrays, index keys write elements (growing with `undefined`) and
    /// `length` is read-only.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if let ObjectKind::Array(elements) = &self.0.kind {
            if let Some(idx) = array_index(&key) {
                let mut elements = elements.borrow_mut();
                if idx >= elements.len() {
                    elements.resize(idx + 1, Value::Undefined);
                }
                elements[idx] = value;
                return;
            }
            if key == "length" {
                return;
            }
        }
        self.0.properties.borrow_mut().insert(key, value);
    }

    /// Builder form of [`ObjectRef::set`].
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn prototype(&self) -> Option<ObjectRef> {
        self.0.prototype.borrow().clone()
    }

    /// Replace the prototype. Rejects changes that would make the chain cyclic.
    pub fn set_prototype(&self, prototype: Option<ObjectRef>) -> Completion<()> {
        let mut cursor = prototype.clone();
        while let Some(obj) = cursor {
            if obj.ptr_eq(self) {
                return Err(ThrownError::type_error("Cyclic __proto__ value"));
            }
            cursor = obj.prototype();
        }
        *self.0.prototype.borrow_mut() = prototype;
        Ok(())
    }

    /// Read an own property without consulting the prototype chain.
    pub fn get_own(&self, key: &str) -> Option<Value> {
        match &self.0.kind {
            ObjectKind::Array(elements) => {
                if let Some(idx) = array_index(key) {
                    return elements.borrow().get(idx).cloned();
                }
                if key == "length" {
                    return Some(Value::from(elements.borrow().len()));
                }
            }
            ObjectKind::Function(f) => match key {
                "length" => return Some(Value::from(f.arity())),
                "name" => return Some(Value::string(f.name())),
                _ => {}
            },
            ObjectKind::Ordinary => {}
        }
        self.0.properties.borrow().get(key).cloned()
    }

    pub fn has_own(&self, key: &str) -> bool {
        self.get_own(key).is_some()
    }

    /// Own property names: indices first for arrays, then the built-in
    /// `length`/`name` slots, then ordinary properties in insertion order.
    pub fn own_property_names(&self) -> Vec<String> {
        let mut names = match &self.0.kind {
            ObjectKind::Array(elements) => (0..elements.borrow().len())
                .map(|i| i.to_string())
                .chain(std::iter::once("length".to_string()))
                .collect(),
            ObjectKind::Function(_) => vec!["length".to_string(), "name".to_string()],
            ObjectKind::Ordinary => Vec::new(),
        };
        names.extend(self.0.properties.borrow().keys().cloned());
        names
    }

    /// Own enumerable `(key, value)` pairs, as `Object.keys` and JSON see them.
    pub fn own_enumerable_entries(&self) -> Vec<(String, Value)> {
        let mut entries: Vec<(String, Value)> = self
            .elements()
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect();
        entries.extend(
            self.0
                .properties
                .borrow()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        entries
    }

    /// Returns `true` if `key` is an own enumerable property.
    pub fn is_enumerable_own(&self, key: &str) -> bool {
        match &self.0.kind {
            ObjectKind::Array(elements) if array_index(key).is_some_and(|i| i < elements.borrow().len()) => true,
            _ => self.0.properties.borrow().contains_key(key),
        }
    }

    /// Read a property through the prototype chain, with `receiver` as the
    /// object the read started from.
    pub fn get(&self, key: &str, receiver: &Value) -> Value {
        let mut cursor = Some(self.clone());
        while let Some(obj) = cursor {
            if let Some(value) = obj.get_own(key) {
                if key == PROTO_KEY && obj.ptr_eq(&Intrinsics::object_prototype()) {
                    return receiver.prototype().map_or(Value::Null, Value::Object);
                }
                return value;
            }
            cursor = obj.prototype();
        }
        Value::Undefined
    }

    /// Join array elements with `separator`, skipping arrays already being
    /// joined further up (`seen`).
    pub(crate) fn join_elements(&self, separator: &str, seen: &mut Vec<usize>) -> String {
        self.elements()
            .iter()
            .map(|v| {
                if v.is_nullish() {
                    String::new()
                } else {
                    v.to_string_guarded(seen)
                }
            })
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// A stable identity for cycle detection.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for ObjectRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            ObjectKind::Function(func) => write!(f, "{func:?}"),
            ObjectKind::Array(elements) => write!(f, "Array({})", elements.borrow().len()),
            ObjectKind::Ordinary => {
                let keys: Vec<String> = self.0.properties.borrow().keys().cloned().collect();
                write!(f, "Object {{ {} }}", keys.join(", "))
            }
        }
    }
}
