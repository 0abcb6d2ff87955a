//! AST node types for probe expressions.
//!
//! The grammar is a read-only JavaScript subset: literals, identifiers,
//! member access, indexing, calls and the usual operators. Every node
//! carries a [`Span`] for error reporting.

use crate::Span;
use std::fmt;

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// An expression with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    height: u32,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        let height = 1 + kind.children().into_iter().map(Expr::height).max().unwrap_or(0);
        Self { kind, span, height }
    }

    /// Levels in this tree; a leaf is 1.
    pub fn height(&self) -> u32 {
        self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Literals ──
    /// `42`, `3.14`, `0xff`
    NumberLit(f64),
    /// `"hello"`, `'hello'`
    StringLit(String),
    /// `true` / `false`
    BoolLit(bool),
    /// `null`
    NullLit,
    /// `[expr, ...]`
    ArrayLit(Vec<Expr>),
    /// `{ key: expr, shorthand, ... }`
    ObjectLit(Vec<ObjectEntry>),

    // ── Names & access ──
    /// `host`, `undefined`
    Identifier(String),
    /// `expr.name` or `expr?.name`
    Member {
        object: Box<Expr>,
        property: Ident,
        optional: bool,
    },
    /// `expr[index]` or `expr?.[index]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        optional: bool,
    },
    /// `callee(args...)` or `callee?.(args...)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        optional: bool,
    },
    /// Boundary of a chain containing `?.`: a short-circuited link makes the
    /// whole chain `undefined`.
    OptionalChain(Box<Expr>),

    // ── Operators ──
    /// `-x`, `!x`, `typeof x`
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `a + b`, `a === b`, etc.
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `a && b`, `a || b`, `a ?? b`
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
    },
    /// `test ? consequent : alternate`
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    /// `(expr)`
    Paren(Box<Expr>),
}

impl ExprKind {
    /// Direct sub-expressions, left to right.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            ExprKind::NumberLit(_)
            | ExprKind::StringLit(_)
            | ExprKind::BoolLit(_)
            | ExprKind::NullLit
            | ExprKind::Identifier(_) => Vec::new(),
            ExprKind::ArrayLit(items) => items.iter().collect(),
            ExprKind::ObjectLit(entries) => entries.iter().map(|e| &e.value).collect(),
            ExprKind::Member { object, .. } => vec![object.as_ref()],
            ExprKind::Index { object, index, .. } => vec![object.as_ref(), index.as_ref()],
            ExprKind::Call { callee, args, .. } => {
                std::iter::once(callee.as_ref()).chain(args).collect()
            }
            ExprKind::OptionalChain(inner) | ExprKind::Paren(inner) => vec![inner.as_ref()],
            ExprKind::Unary { operand, .. } => vec![operand.as_ref()],
            ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
                vec![left.as_ref(), right.as_ref()]
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => vec![test.as_ref(), consequent.as_ref(), alternate.as_ref()],
        }
    }
}

/// One entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    pub key: Ident,
    pub value: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Neg,
    /// `+`
    Plus,
    /// `typeof`
    TypeOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Coalesce,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Not => "!",
            Self::Neg => "-",
            Self::Plus => "+",
            Self::TypeOf => "typeof",
        })
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::StrictEq => "===",
            Self::StrictNotEq => "!==",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
        })
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Coalesce => "??",
        })
    }
}
