//! Core expression evaluator.

use crate::env::Environment;
use probe_types::ast::*;
use probe_types::{Completion, ObjectRef, ThrownError, Value};

/// Why evaluation of a sub-expression stopped early.
enum Interrupt {
    /// An exception propagating to the top.
    Throw(ThrownError),
    /// An optional link met `undefined`/`null`; the enclosing chain yields
    /// `undefined`.
    ShortCircuit,
}

impl From<ThrownError> for Interrupt {
    fn from(err: ThrownError) -> Self {
        Self::Throw(err)
    }
}

type Flow<T> = Result<T, Interrupt>;

/// The core evaluator — walks AST nodes and produces Values.
///
/// Evaluation only reads the object graph; the only way an expression can
/// reach the host is by calling a native function found in the graph.
pub struct Evaluator<'env> {
    env: &'env Environment,
}

impl<'env> Evaluator<'env> {
    pub fn new(env: &'env Environment) -> Self {
        Self { env }
    }

    /// Evaluate an expression to a Value.
    pub fn eval(&self, expr: &Expr) -> Completion<Value> {
        match self.eval_expr(expr) {
            Ok(value) => Ok(value),
            Err(Interrupt::Throw(err)) => Err(err),
            Err(Interrupt::ShortCircuit) => Ok(Value::Undefined),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    fn eval_expr(&self, expr: &Expr) -> Flow<Value> {
        match &expr.kind {
            ExprKind::NumberLit(n) => Ok(Value::Number(*n)),
            ExprKind::StringLit(s) => Ok(Value::String(s.clone())),
            ExprKind::BoolLit(b) => Ok(Value::Bool(*b)),
            ExprKind::NullLit => Ok(Value::Null),
            ExprKind::ArrayLit(elems) => self.eval_array_literal(elems),
            ExprKind::ObjectLit(entries) => self.eval_object_literal(entries),

            ExprKind::Identifier(name) => self.eval_identifier(name),
            ExprKind::Member {
                object,
                property,
                optional,
            } => {
                let target = self.eval_expr(object)?;
                self.read(&target, &property.name, *optional)
            }
            ExprKind::Index {
                object,
                index,
                optional,
            } => {
                let target = self.eval_expr(object)?;
                if *optional && target.is_nullish() {
                    return Err(Interrupt::ShortCircuit);
                }
                let key = property_key(&self.eval_expr(index)?);
                self.read(&target, &key, false)
            }
            ExprKind::Call {
                callee,
                args,
                optional,
            } => self.eval_call(callee, args, *optional),
            ExprKind::OptionalChain(inner) => match self.eval_expr(inner) {
                Err(Interrupt::ShortCircuit) => Ok(Value::Undefined),
                other => other,
            },

            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand),
            ExprKind::Binary { left, op, right } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                Ok(binary(*op, &l, &r))
            }
            ExprKind::Logical { left, op, right } => {
                let l = self.eval_expr(left)?;
                let take_left = match op {
                    LogicalOp::And => !l.is_truthy(),
                    LogicalOp::Or => l.is_truthy(),
                    LogicalOp::Coalesce => !l.is_nullish(),
                };
                if take_left {
                    Ok(l)
                } else {
                    self.eval_expr(right)
                }
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval_expr(test)?.is_truthy() {
                    self.eval_expr(consequent)
                } else {
                    self.eval_expr(alternate)
                }
            }
            ExprKind::Paren(inner) => self.eval_expr(inner),
        }
    }

    // ── Literals ──────────────────────────────────────────────────────────

    fn eval_array_literal(&self, elems: &[Expr]) -> Flow<Value> {
        let mut values = Vec::with_capacity(elems.len());
        for elem in elems {
            values.push(self.eval_expr(elem)?);
        }
        Ok(Value::array(values))
    }

    fn eval_object_literal(&self, entries: &[ObjectEntry]) -> Flow<Value> {
        let obj = ObjectRef::new();
        for entry in entries {
            let value = self.eval_expr(&entry.value)?;
            if entry.key.name == "__proto__" {
                // `{ __proto__: p }` sets the prototype; non-objects are ignored.
                match value {
                    Value::Object(proto) => obj.set_prototype(Some(proto))?,
                    Value::Null => obj.set_prototype(None)?,
                    _ => {}
                }
                continue;
            }
            obj.set(entry.key.name.clone(), value);
        }
        Ok(Value::Object(obj))
    }

    // ── Names & access ────────────────────────────────────────────────────

    fn eval_identifier(&self, name: &str) -> Flow<Value> {
        match self.env.get(name) {
            Some(value) => Ok(value.clone()),
            None => Err(ThrownError::reference_error(format!("{name} is not defined")).into()),
        }
    }

    fn read(&self, target: &Value, key: &str, optional: bool) -> Flow<Value> {
        if optional && target.is_nullish() {
            return Err(Interrupt::ShortCircuit);
        }
        Ok(target.get_property(key)?)
    }

    /// Evaluate a call. Member and index callees bind `this` to the object
    /// the function was read from.
    fn eval_call(&self, callee: &Expr, args: &[Expr], optional: bool) -> Flow<Value> {
        let (this, function) = match &callee.kind {
            ExprKind::Member {
                object,
                property,
                optional: link_optional,
            } => {
                let target = self.eval_expr(object)?;
                let function = self.read(&target, &property.name, *link_optional)?;
                (target, function)
            }
            ExprKind::Index {
                object,
                index,
                optional: link_optional,
            } => {
                let target = self.eval_expr(object)?;
                if *link_optional && target.is_nullish() {
                    return Err(Interrupt::ShortCircuit);
                }
                let key = property_key(&self.eval_expr(index)?);
                let function = self.read(&target, &key, false)?;
                (target, function)
            }
            _ => (Value::Undefined, self.eval_expr(callee)?),
        };

        if optional && function.is_nullish() {
            return Err(Interrupt::ShortCircuit);
        }

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }

        match function.as_object().and_then(ObjectRef::as_function) {
            Some(native) => {
                tracing::trace!(function = native.name(), args = values.len(), "native call");
                Ok(native.call(&this, &values)?)
            }
            None => Err(ThrownError::type_error(format!(
                "{} is not a function",
                describe_callee(callee)
            ))
            .into()),
        }
    }

    // ── Operators ─────────────────────────────────────────────────────────

    fn eval_unary(&self, op: UnaryOp, operand: &Expr) -> Flow<Value> {
        if op == UnaryOp::TypeOf {
            // `typeof` of an undeclared name is "undefined", not an error.
            if let ExprKind::Identifier(name) = &operand.kind {
                if !self.env.contains(name) {
                    return Ok(Value::string("undefined"));
                }
            }
            let value = self.eval_expr(operand)?;
            return Ok(Value::string(value.type_of()));
        }
        let value = self.eval_expr(operand)?;
        Ok(match op {
            UnaryOp::Not => Value::Bool(!value.is_truthy()),
            UnaryOp::Neg => Value::Number(-value.to_number()),
            UnaryOp::Plus | UnaryOp::TypeOf => Value::Number(value.to_number()),
        })
    }
}

/// Convert an index value to a property key.
fn property_key(value: &Value) -> String {
    value.to_display_string()
}

/// Convert an object operand to a primitive for `+` and comparisons.
fn to_primitive(value: &Value) -> Value {
    match value {
        Value::Object(_) => Value::String(value.to_display_string()),
        other => other.clone(),
    }
}

fn binary(op: BinOp, l: &Value, r: &Value) -> Value {
    match op {
        BinOp::Add => {
            let (l, r) = (to_primitive(l), to_primitive(r));
            if matches!(l, Value::String(_)) || matches!(r, Value::String(_)) {
                Value::String(l.to_display_string() + &r.to_display_string())
            } else {
                Value::Number(l.to_number() + r.to_number())
            }
        }
        BinOp::Sub => Value::Number(l.to_number() - r.to_number()),
        BinOp::Mul => Value::Number(l.to_number() * r.to_number()),
        BinOp::Div => Value::Number(l.to_number() / r.to_number()),
        BinOp::Mod => Value::Number(l.to_number() % r.to_number()),
        BinOp::Eq => Value::Bool(l.loose_equals(r)),
        BinOp::NotEq => Value::Bool(!l.loose_equals(r)),
        BinOp::StrictEq => Value::Bool(l.strict_equals(r)),
        BinOp::StrictNotEq => Value::Bool(!l.strict_equals(r)),
        BinOp::Less => Value::Bool(compare(l, r).is_some_and(|o| o.is_lt())),
        BinOp::LessEq => Value::Bool(compare(l, r).is_some_and(|o| o.is_le())),
        BinOp::Greater => Value::Bool(compare(l, r).is_some_and(|o| o.is_gt())),
        BinOp::GreaterEq => Value::Bool(compare(l, r).is_some_and(|o| o.is_ge())),
    }
}

/// Relational comparison: strings compare by code units, everything else
/// numerically. `None` when either side is `NaN`.
fn compare(l: &Value, r: &Value) -> Option<std::cmp::Ordering> {
    match (to_primitive(l), to_primitive(r)) {
        (Value::String(a), Value::String(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
        (a, b) => a.to_number().partial_cmp(&b.to_number()),
    }
}

/// Source-like description of a callee for "is not a function" messages.
fn describe_callee(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::Member {
            object, property, ..
        } => format!("{}.{}", describe_callee(object), property.name),
        ExprKind::Index { object, .. } => format!("{}[...]", describe_callee(object)),
        ExprKind::Call { callee, .. } => format!("{}(...)", describe_callee(callee)),
        ExprKind::Paren(inner) | ExprKind::OptionalChain(inner) => describe_callee(inner),
        _ => "expression".to_string(),
    }
}
