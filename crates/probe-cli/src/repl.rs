//! Interactive session: evaluate lines against the host API, with
//! `:`-commands for browsing and settings.

use crate::members;
use anyhow::{bail, Context, Result};
use probe_eval::evaluate;
use probe_explorer::{Configuration, Explorer, Host};
use std::path::PathBuf;

pub const HELP_TEXT: &str = r#"Commands:
  <expression>          Evaluate against the host API
  :pick                 Browse from the root and evaluate a member
  :eval                 Prompt for an expression with full presentation
  :members [path]       List the members of a path (default: the root)
  :config               Show the current settings
  :set <key> <value>    Change a setting (includePrototype, includePrivate, showAPIShortcut)
  :reload               Re-read the settings file
  :help                 Show this help
  :quit                 Exit"#;

/// One parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Empty,
    Evaluate(String),
    Pick,
    Prompt,
    Members(Option<String>),
    Config,
    Set { key: String, value: String },
    Reload,
    Help,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(command) = line.strip_prefix(':') else {
            return Self::Evaluate(line.to_string());
        };
        let words: Vec<&str> = command.split_whitespace().collect();
        match words.as_slice() {
            ["pick"] => Self::Pick,
            ["eval"] => Self::Prompt,
            ["members"] => Self::Members(None),
            ["members", path] => Self::Members(Some(path.to_string())),
            ["config"] => Self::Config,
            ["set", key, value] => Self::Set {
                key: key.to_string(),
                value: value.to_string(),
            },
            ["reload"] => Self::Reload,
            ["help" | "h" | "?"] => Self::Help,
            ["quit" | "q" | "exit"] => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Result of handling one line.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(Option<String>),
    Exit,
}

pub struct Repl<H: Host> {
    explorer: Explorer,
    host: H,
    settings: Option<PathBuf>,
}

impl<H: Host> Repl<H> {
    pub fn new(explorer: Explorer, host: H, settings: Option<PathBuf>) -> Self {
        Self {
            explorer,
            host,
            settings,
        }
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Handle one input line.
    pub fn process_line(&mut self, line: &str) -> Result<Flow> {
        let output = match ReplCommand::parse(line) {
            ReplCommand::Empty => None,
            ReplCommand::Evaluate(expression) => {
                Some(evaluate(&expression, self.explorer.environment()).rendered_text)
            }
            ReplCommand::Pick => {
                self.explorer.pick_expression(&mut self.host)?;
                None
            }
            ReplCommand::Prompt => {
                self.explorer.evaluate(&mut self.host);
                None
            }
            ReplCommand::Members(path) => {
                let path = path.unwrap_or_else(|| self.explorer.root_name().to_string());
                Some(members::render(&self.explorer, &path)?)
            }
            ReplCommand::Config => Some(
                serde_json::to_string_pretty(&self.explorer.configuration())
                    .context("Failed to serialize settings")?,
            ),
            ReplCommand::Set { key, value } => {
                let mut config = self.explorer.configuration();
                config.set(&key, &value)?;
                self.explorer.on_configuration_changed(&mut self.host, config);
                Some(format!("{key} = {value}"))
            }
            ReplCommand::Reload => {
                let Some(path) = &self.settings else {
                    bail!("no settings file was given (use --settings FILE)");
                };
                let config = Configuration::load(path)?;
                self.explorer.on_configuration_changed(&mut self.host, config);
                Some(format!("reloaded {}", path.display()))
            }
            ReplCommand::Help => Some(HELP_TEXT.to_string()),
            ReplCommand::Quit => return Ok(Flow::Exit),
            ReplCommand::Unknown(line) => bail!("unknown command '{line}' (try :help)"),
        };
        Ok(Flow::Continue(output))
    }
}
