//! The interaction loop: browse the object graph, then evaluate.
//!
//! A [`Session`] is an explicit state machine over an owned stack of
//! [`Frame`]s. It starts browsing the root, descends into picked objects,
//! and hands the path of any other pick to an editable prompt whose
//! confirmed text is evaluated and presented.

use crate::config::Configuration;
use crate::enumerate::{enumerate, PropertyDescriptor};
use crate::error::InvalidTargetError;
use crate::host::{Host, InputBoxOptions, MessageAction, QuickPickItem};
use probe_eval::{evaluate, Environment, EvaluationOutcome};
use probe_types::Value;

/// Placeholder of the expression prompt.
pub const INPUT_PLACEHOLDER: &str = "Insert an API call here...";
/// Prompt text of the expression prompt.
pub const INPUT_PROMPT: &str = "Host API calls";

/// An object being browsed and the path that reached it.
#[derive(Debug, Clone)]
pub struct Frame {
    pub object: Value,
    pub path: String,
}

impl Frame {
    pub fn new(object: Value, path: impl Into<String>) -> Self {
        Self {
            object,
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionState {
    /// Showing the picker for the top frame.
    Browsing(Vec<Frame>),
    /// Prompting for an expression, prefilled with this path.
    Evaluating(String),
    Finished,
}

/// What picking a descriptor leads to.
#[derive(Debug, Clone)]
pub enum Transition {
    Descend(Frame),
    Evaluate(String),
}

impl Transition {
    /// Objects and arrays are browsed into; functions, primitives, `null`
    /// and the `this` entry go to the prompt.
    pub fn for_pick(frame: &Frame, picked: &PropertyDescriptor) -> Self {
        let path = format!("{}{}", frame.path, picked.access_path);
        if picked.is_navigable() {
            Self::Descend(Frame::new(picked.value.clone(), path))
        } else {
            Self::Evaluate(path)
        }
    }
}

/// One pick-and-evaluate interaction chain.
///
/// Each session owns its state; the configuration is the snapshot taken
/// when the session started.
pub struct Session<'a> {
    env: &'a Environment,
    config: Configuration,
    panel_name: &'a str,
    state: SessionState,
}

impl<'a> Session<'a> {
    pub fn new(
        root: Value,
        root_name: &str,
        env: &'a Environment,
        config: Configuration,
        panel_name: &'a str,
    ) -> Self {
        Self {
            env,
            config,
            panel_name,
            state: SessionState::Browsing(vec![Frame::new(root, root_name)]),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::Finished)
    }

    /// Run the session to completion. Returns the outcome of the
    /// evaluation, if the user got that far.
    pub fn run(mut self, host: &mut dyn Host) -> Result<Option<EvaluationOutcome>, InvalidTargetError> {
        while !self.is_finished() {
            if let Some(outcome) = self.step(host)? {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    /// Advance by one prompt.
    pub fn step(&mut self, host: &mut dyn Host) -> Result<Option<EvaluationOutcome>, InvalidTargetError> {
        match std::mem::replace(&mut self.state, SessionState::Finished) {
            SessionState::Browsing(frames) => {
                self.browse(host, frames)?;
                Ok(None)
            }
            SessionState::Evaluating(path) => Ok(self.prompt(host, path)),
            SessionState::Finished => Ok(None),
        }
    }

    fn browse(&mut self, host: &mut dyn Host, mut frames: Vec<Frame>) -> Result<(), InvalidTargetError> {
        let Some(top) = frames.last() else {
            return Ok(());
        };
        let descriptors = enumerate(
            &top.object,
            &top.path,
            self.config.include_prototype,
            self.config.include_private,
        )?;
        let items: Vec<QuickPickItem> = descriptors
            .iter()
            .map(|d| QuickPickItem {
                label: d.label.clone(),
                description: d.description.clone(),
            })
            .collect();

        let Some(picked) = host
            .show_quick_pick(&items, &top.path)
            .and_then(|index| descriptors.get(index))
        else {
            tracing::debug!(path = %top.path, "picker dismissed");
            return Ok(());
        };

        self.state = match Transition::for_pick(top, picked) {
            Transition::Descend(frame) => {
                tracing::debug!(path = %frame.path, depth = frames.len(), "descending");
                frames.push(frame);
                SessionState::Browsing(frames)
            }
            Transition::Evaluate(path) => {
                tracing::debug!(path = %path, "picked for evaluation");
                SessionState::Evaluating(path)
            }
        };
        Ok(())
    }

    fn prompt(&mut self, host: &mut dyn Host, path: String) -> Option<EvaluationOutcome> {
        let options = InputBoxOptions {
            value: path,
            placeholder: INPUT_PLACEHOLDER.to_string(),
            prompt: INPUT_PROMPT.to_string(),
        };
        let expression = host.show_input_box(&options)?;
        if expression.trim().is_empty() {
            return None;
        }
        Some(present_evaluation(host, self.env, self.panel_name, &expression))
    }
}

/// Evaluate `expression` and present the outcome.
///
/// The panel is cleared on every run and written only on success. Success
/// offers `Re-Evaluate` and `Show Full Output`; failure offers only
/// `Show Full Output`. Re-evaluating loops with the same expression.
/// Returns the last outcome.
pub fn present_evaluation(
    host: &mut dyn Host,
    env: &Environment,
    panel_name: &str,
    expression: &str,
) -> EvaluationOutcome {
    loop {
        let outcome = evaluate(expression, env);

        let panel = host.output_panel(panel_name);
        panel.clear();
        let action = if outcome.succeeded {
            panel.append_line(&format!("Expression: {expression}"));
            panel.append_line(&format!("Output: {}", outcome.rendered_text));
            host.show_information_message(
                &outcome.rendered_text,
                &[MessageAction::ReEvaluate, MessageAction::ShowFullOutput],
            )
        } else {
            host.show_error_message(&outcome.rendered_text, &[MessageAction::ShowFullOutput])
        };

        match action {
            Some(MessageAction::ReEvaluate) => {
                tracing::debug!(expression, "re-evaluating");
            }
            Some(MessageAction::ShowFullOutput) => {
                host.output_panel(panel_name).show();
                return outcome;
            }
            None => return outcome,
        }
    }
}
