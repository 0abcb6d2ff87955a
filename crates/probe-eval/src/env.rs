//! The ambient environment expressions are evaluated against.

use crate::builtins;
use indexmap::IndexMap;
use probe_types::Value;

/// Global bindings visible to an expression.
///
/// A fresh environment holds the built-in globals (`undefined`, `NaN`,
/// `Infinity`, `Math`, `JSON`, `Object`); the host adds its root object
/// under its own name. The graph behind the bindings is only read.
#[derive(Debug, Clone)]
pub struct Environment {
    globals: IndexMap<String, Value>,
}

impl Environment {
    /// Create an environment with only the built-in globals.
    pub fn new() -> Self {
        let mut env = Self {
            globals: IndexMap::new(),
        };
        builtins::install(&mut env);
        env
    }

    /// Create an environment exposing `root` as `name`.
    pub fn with_root(name: &str, root: Value) -> Self {
        let mut env = Self::new();
        env.define(name, root);
        env
    }

    /// Bind a global, replacing any previous binding of the same name.
    pub fn define(&mut self, name: &str, value: Value) {
        self.globals.insert(name.to_string(), value);
    }

    /// Look up a global.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.globals.contains_key(name)
    }

    /// Global names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.globals.keys().map(String::as_str)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
