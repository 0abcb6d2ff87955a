//! The explorer: root object, settings, status item and the two commands.

use crate::config::{ConfigStore, Configuration};
use crate::error::{ExplorerError, InvalidTargetError};
use crate::host::{Host, InputBoxOptions, StatusItem};
use crate::session::{present_evaluation, Session, INPUT_PLACEHOLDER, INPUT_PROMPT};
use probe_eval::{Environment, EvaluationOutcome};
use probe_types::Value;

/// Command that starts browsing from the root object.
pub const PICK_EXPRESSION_COMMAND: &str = "probe.pickExpression";
/// Command that prompts for an expression directly.
pub const EVALUATE_COMMAND: &str = "probe.evaluate";

const PANEL_NAME: &str = "Probe";

/// Entry point a host wires its commands and settings events to.
///
/// The root object is passed in explicitly and is also bound under its
/// name in the evaluation environment.
pub struct Explorer {
    root: Value,
    root_name: String,
    env: Environment,
    config: ConfigStore,
    status_item: StatusItem,
    default_expression: String,
    panel_name: String,
}

impl Explorer {
    pub fn new(root: Value, root_name: impl Into<String>, config: ConfigStore) -> Self {
        let root_name = root_name.into();
        Self {
            env: Environment::with_root(&root_name, root.clone()),
            default_expression: format!("{root_name}.window.activeTextEditor"),
            root,
            root_name,
            config,
            status_item: StatusItem {
                text: "$(plug)".to_string(),
                tooltip: "Pick the host API".to_string(),
                command: PICK_EXPRESSION_COMMAND.to_string(),
            },
            panel_name: PANEL_NAME.to_string(),
        }
    }

    /// Replace the text the evaluate prompt starts with.
    pub fn with_default_expression(mut self, expression: impl Into<String>) -> Self {
        self.default_expression = expression.into();
        self
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn status_item(&self) -> &StatusItem {
        &self.status_item
    }

    pub fn panel_name(&self) -> &str {
        &self.panel_name
    }

    pub fn default_expression(&self) -> &str {
        &self.default_expression
    }

    /// The current settings.
    pub fn configuration(&self) -> Configuration {
        self.config.snapshot()
    }

    /// Show or hide the status item according to the current settings.
    pub fn activate(&self, host: &mut dyn Host) {
        self.apply_status(host, self.config.snapshot());
    }

    /// Browse from the root and evaluate the chosen path.
    ///
    /// Browsing into a `null` or `undefined` target is reported to the user
    /// and returned as an error.
    pub fn pick_expression(
        &self,
        host: &mut dyn Host,
    ) -> Result<Option<EvaluationOutcome>, InvalidTargetError> {
        let session = Session::new(
            self.root.clone(),
            &self.root_name,
            &self.env,
            self.config.snapshot(),
            &self.panel_name,
        );
        session.run(host).inspect_err(|err| {
            tracing::warn!(error = %err, "pick aborted");
            host.show_error_message(&err.to_string(), &[]);
        })
    }

    /// Prompt for an expression and evaluate it.
    pub fn evaluate(&self, host: &mut dyn Host) -> Option<EvaluationOutcome> {
        let options = InputBoxOptions {
            value: self.default_expression.clone(),
            placeholder: INPUT_PLACEHOLDER.to_string(),
            prompt: INPUT_PROMPT.to_string(),
        };
        let expression = host.show_input_box(&options)?;
        if expression.trim().is_empty() {
            return None;
        }
        Some(present_evaluation(host, &self.env, &self.panel_name, &expression))
    }

    /// Run a command by its identifier.
    pub fn execute_command(
        &self,
        host: &mut dyn Host,
        command: &str,
    ) -> Result<Option<EvaluationOutcome>, ExplorerError> {
        tracing::debug!(command, "executing command");
        match command {
            PICK_EXPRESSION_COMMAND => Ok(self.pick_expression(host)?),
            EVALUATE_COMMAND => Ok(self.evaluate(host)),
            other => Err(ExplorerError::UnknownCommand(other.to_string())),
        }
    }

    /// Install new settings and re-apply the status item visibility.
    /// Sessions already running keep the snapshot they started with.
    pub fn on_configuration_changed(&self, host: &mut dyn Host, config: Configuration) {
        let previous = self.config.replace(config);
        if previous != config {
            tracing::info!(?config, "configuration changed");
        }
        self.apply_status(host, config);
    }

    /// Hide the status item.
    pub fn dispose(&self, host: &mut dyn Host) {
        host.update_status_item(&self.status_item, false);
    }

    fn apply_status(&self, host: &mut dyn Host, config: Configuration) {
        host.update_status_item(&self.status_item, config.show_api_shortcut);
    }
}
