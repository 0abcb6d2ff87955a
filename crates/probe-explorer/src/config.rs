//! Explorer settings and the live store sessions read them from.

use crate::error::ConfigError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// The three user settings, under their host setting names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    /// List `__`-prefixed members.
    pub include_prototype: bool,
    /// List `_`-prefixed members.
    pub include_private: bool,
    /// Show the status item that opens the picker.
    #[serde(rename = "showAPIShortcut")]
    pub show_api_shortcut: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            include_prototype: false,
            include_private: true,
            show_api_shortcut: true,
        }
    }
}

impl Configuration {
    /// Setting names accepted by [`Configuration::set`].
    pub const KEYS: [&'static str; 3] = ["includePrototype", "includePrivate", "showAPIShortcut"];

    /// Load settings from a JSON file. Missing keys take their defaults and
    /// unknown keys are ignored.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Update one setting by name from its textual value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let slot = match key {
            "includePrototype" => &mut self.include_prototype,
            "includePrivate" => &mut self.include_private,
            "showAPIShortcut" => &mut self.show_api_shortcut,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        *slot = match value {
            "true" | "on" => true,
            "false" | "off" => false,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            }
        };
        Ok(())
    }
}

/// Shared, whole-value-replaced configuration.
///
/// Readers take a snapshot; writers replace the entire value, so a reader
/// never sees a partially applied change.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    inner: Arc<RwLock<Configuration>>,
}

impl ConfigStore {
    pub fn new(config: Configuration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// The current configuration.
    pub fn snapshot(&self) -> Configuration {
        *self.inner.read()
    }

    /// Replace the configuration, returning the previous value.
    pub fn replace(&self, config: Configuration) -> Configuration {
        std::mem::replace(&mut *self.inner.write(), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert!(!config.include_prototype);
        assert!(config.include_private);
        assert!(config.show_api_shortcut);
    }

    #[test]
    fn test_parse_uses_setting_names() {
        let config = Configuration::from_json_str(
            r#"{"includePrototype": true, "showAPIShortcut": false, "unrelated": 1}"#,
        )
        .expect("valid settings");
        assert_eq!(
            config,
            Configuration {
                include_prototype: true,
                include_private: true,
                show_api_shortcut: false,
            }
        );
    }

    #[test]
    fn test_serialize_uses_setting_names() {
        let json = serde_json::to_value(Configuration::default()).expect("json");
        assert_eq!(
            json,
            serde_json::json!({
                "includePrototype": false,
                "includePrivate": true,
                "showAPIShortcut": true
            })
        );
    }

    #[test]
    fn test_parse_error() {
        assert!(Configuration::from_json_str(r#"{"includePrivate": "yes"}"#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Configuration::load("/definitely/not/here/settings.json").expect_err("io");
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("probe-settings-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"includePrivate": false}"#).expect("write");
        let config = Configuration::load(&path).expect("load");
        std::fs::remove_file(&path).ok();
        assert!(!config.include_private);
    }

    #[test]
    fn test_set_by_name() {
        let mut config = Configuration::default();
        config.set("includePrototype", "true").expect("known key");
        assert!(config.include_prototype);
        assert!(matches!(
            config.set("includeEverything", "true"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            config.set("includePrivate", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(config.include_private);
    }

    #[test]
    fn test_store_replaces_whole_value() {
        let store = ConfigStore::default();
        let reader = store.clone();
        let next = Configuration {
            include_prototype: true,
            include_private: false,
            show_api_shortcut: false,
        };
        let previous = store.replace(next);
        assert_eq!(previous, Configuration::default());
        assert_eq!(reader.snapshot(), next);
    }
}
