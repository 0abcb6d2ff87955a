//! The host surface the explorer drives: pickers, prompts, messages, a
//! status item and an output panel.
//!
//! Every prompt blocks until the user answers; `None` means the prompt was
//! dismissed.

use std::fmt;

/// One row of a quick pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickPickItem {
    pub label: String,
    pub description: String,
}

/// Options for a single-line text prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBoxOptions {
    /// Editable initial text.
    pub value: String,
    /// Hint shown while the box is empty.
    pub placeholder: String,
    /// Text shown under the box.
    pub prompt: String,
}

/// Follow-up actions offered with an evaluation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageAction {
    ReEvaluate,
    ShowFullOutput,
}

impl MessageAction {
    /// The button title.
    pub fn title(self) -> &'static str {
        match self {
            Self::ReEvaluate => "Re-Evaluate",
            Self::ShowFullOutput => "Show Full Output",
        }
    }
}

impl fmt::Display for MessageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A persistent status bar entry that runs a command when clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusItem {
    pub text: String,
    pub tooltip: String,
    pub command: String,
}

/// An append-only text panel.
pub trait OutputPanel {
    fn clear(&mut self);
    fn append_line(&mut self, line: &str);
    /// Reveal the panel to the user.
    fn show(&mut self);
}

/// The UI primitives the explorer needs from its host.
pub trait Host {
    /// Show a searchable list; returns the index of the chosen item.
    fn show_quick_pick(&mut self, items: &[QuickPickItem], placeholder: &str) -> Option<usize>;

    fn show_input_box(&mut self, options: &InputBoxOptions) -> Option<String>;

    fn show_information_message(
        &mut self,
        message: &str,
        actions: &[MessageAction],
    ) -> Option<MessageAction>;

    fn show_error_message(
        &mut self,
        message: &str,
        actions: &[MessageAction],
    ) -> Option<MessageAction>;

    fn update_status_item(&mut self, item: &StatusItem, visible: bool);

    /// The output panel called `name`, created on first use.
    fn output_panel(&mut self, name: &str) -> &mut dyn OutputPanel;
}

/// An in-memory [`OutputPanel`] that records its lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferedPanel {
    lines: Vec<String>,
    shown: usize,
}

impl BufferedPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines appended since the last clear.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// How many times the panel has been revealed.
    pub fn times_shown(&self) -> usize {
        self.shown
    }
}

impl OutputPanel for BufferedPanel {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn append_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn show(&mut self) {
        self.shown += 1;
    }
}
