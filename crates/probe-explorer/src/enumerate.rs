//! Property enumeration: turns an object into the picker's entry list.

use crate::error::InvalidTargetError;
use indexmap::IndexSet;
use probe_types::{ObjectRef, Value};
use std::cmp::Ordering;

/// One selectable entry in the property picker.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    /// Text shown in the picker: the property name, `parent[3]` for array
    /// elements, or `this` for the object itself.
    pub label: String,
    /// Secondary text: the type tag, or the last path component for `this`.
    pub description: String,
    /// `typeof` name, with arrays reported as `object:array(N)`.
    pub type_tag: String,
    /// Suffix extending the current path (`.name` or `[3]`); empty for `this`.
    pub access_path: String,
    pub value: Value,
}

impl PropertyDescriptor {
    /// Returns `true` for the synthetic entry standing for the object itself.
    pub fn is_self(&self) -> bool {
        self.access_path.is_empty()
    }

    /// Returns `true` when picking this entry should browse into it.
    pub fn is_navigable(&self) -> bool {
        !self.is_self()
            && self.type_tag.split(':').next() == Some("object")
            && self.value.as_object().is_some()
    }

    fn is_function(&self) -> bool {
        self.type_tag == "function"
    }
}

/// List the properties of `object`, reached through `path`.
///
/// The result always starts with the `this` entry, followed by functions
/// and then everything else, each group in locale order of labels.
/// `__`-prefixed names need `include_prototype`, `_`-prefixed names need
/// `include_private`, and properties whose value is `undefined` are left out.
pub fn enumerate(
    object: &Value,
    path: &str,
    include_prototype: bool,
    include_private: bool,
) -> Result<Vec<PropertyDescriptor>, InvalidTargetError> {
    if object.is_nullish() {
        tracing::warn!(path, "cannot enumerate a nullish target");
        return Err(InvalidTargetError {
            path: path.to_string(),
            value: if matches!(object, Value::Null) {
                "null"
            } else {
                "undefined"
            },
        });
    }

    let last_component = last_path_component(path);
    let is_array = object.as_object().is_some_and(ObjectRef::is_array);

    let mut names: IndexSet<String> = object.own_property_names().into_iter().collect();
    if let Some(proto) = object.prototype() {
        names.extend(proto.own_property_names());
    }

    let mut entries: Vec<PropertyDescriptor> = names
        .into_iter()
        .filter(|name| name_visible(name, include_prototype, include_private))
        .filter_map(|name| {
            let value = object.get_property(&name).ok()?;
            let type_tag = value.type_tag();
            if type_tag == "undefined" {
                return None;
            }
            let (label, access_path) = if is_array && is_index_name(&name) {
                (format!("{last_component}[{name}]"), format!("[{name}]"))
            } else {
                (name.clone(), format!(".{name}"))
            };
            Some(PropertyDescriptor {
                label,
                description: type_tag.clone(),
                type_tag,
                access_path,
                value,
            })
        })
        .collect();

    entries.sort_by(|a, b| match (a.is_function(), b.is_function()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => locale_compare(&a.label, &b.label),
    });

    let mut result = Vec::with_capacity(entries.len() + 1);
    result.push(PropertyDescriptor {
        label: "this".to_string(),
        description: last_component.to_string(),
        type_tag: object.type_tag(),
        access_path: String::new(),
        value: object.clone(),
    });
    result.extend(entries);

    tracing::debug!(path, count = result.len(), "enumerated properties");
    Ok(result)
}

fn name_visible(name: &str, include_prototype: bool, include_private: bool) -> bool {
    if name.starts_with("__") {
        include_prototype
    } else if name.starts_with('_') {
        include_private
    } else {
        true
    }
}

fn is_index_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

/// The text after the final `.` of a path (the whole path if it has none).
pub fn last_path_component(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// Case-aware ordering of labels: case-insensitive first, then lowercase
/// before uppercase at the first differing character.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| {
        a.chars()
            .zip(b.chars())
            .find(|(x, y)| x != y)
            .map_or_else(
                || a.len().cmp(&b.len()),
                |(x, y)| match (x.is_lowercase(), y.is_lowercase()) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => x.cmp(&y),
                },
            )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_path_component() {
        assert_eq!(last_path_component("host.window.terminals"), "terminals");
        assert_eq!(last_path_component("host"), "host");
        assert_eq!(last_path_component("host.list[2]"), "list[2]");
    }

    #[test]
    fn test_locale_compare() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("Zeta", "alpha"), Ordering::Greater);
        assert_eq!(locale_compare("item", "item"), Ordering::Equal);
        assert_eq!(locale_compare("item", "items"), Ordering::Less);
    }

    #[test]
    fn test_name_visibility() {
        assert!(!name_visible("__proto__", false, true));
        assert!(name_visible("__proto__", true, false));
        assert!(!name_visible("_private", true, false));
        assert!(name_visible("_private", false, true));
        assert!(name_visible("public", false, false));
    }
}
