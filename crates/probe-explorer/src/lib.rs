//! Probe explorer: browse a host object graph and evaluate expressions
//! against it.
//!
//! The [`Explorer`] owns the root object and the live [`Configuration`] and
//! exposes the two user commands. Each command runs one interaction chain
//! against a [`Host`] that supplies the pickers, prompts, messages and the
//! output panel.

pub mod config;
pub mod enumerate;
pub mod error;
pub mod explorer;
pub mod host;
pub mod session;

pub use config::{ConfigStore, Configuration};
pub use enumerate::{enumerate, last_path_component, locale_compare, PropertyDescriptor};
pub use error::{ConfigError, ExplorerError, InvalidTargetError};
pub use explorer::{Explorer, EVALUATE_COMMAND, PICK_EXPRESSION_COMMAND};
pub use host::{
    BufferedPanel, Host, InputBoxOptions, MessageAction, OutputPanel, QuickPickItem, StatusItem,
};
pub use session::{present_evaluation, Frame, Session, SessionState, Transition};
