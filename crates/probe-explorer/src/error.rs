//! Error types for the explorer.

use std::path::PathBuf;
use thiserror::Error;

/// Enumerating `undefined` or `null`: there are no properties to list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot enumerate properties of {value} at '{path}'")]
pub struct InvalidTargetError {
    /// The display path of the target.
    pub path: String,
    /// `"undefined"` or `"null"`.
    pub value: &'static str,
}

/// Loading or editing the configuration failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown setting '{0}' (expected includePrototype, includePrivate or showAPIShortcut)")]
    UnknownKey(String),
    #[error("setting '{key}' expects true or false, got '{value}'")]
    InvalidValue { key: String, value: String },
}

/// Errors surfaced by [`crate::Explorer`] commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorerError {
    #[error(transparent)]
    InvalidTarget(#[from] InvalidTargetError),
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}
