//! A [`Host`] backed by the terminal.
//!
//! Pickers print a numbered list and read a choice; any other text filters
//! the list. Input boxes are editable lines prefilled with their value.
//! Messages print their actions as numbered buttons.

use anyhow::{Context, Result};
use probe_explorer::{Host, InputBoxOptions, MessageAction, OutputPanel, QuickPickItem, StatusItem};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::collections::HashMap;

/// A panel that prints its lines when revealed.
#[derive(Debug, Default)]
pub struct TerminalPanel {
    name: String,
    lines: Vec<String>,
}

impl OutputPanel for TerminalPanel {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn append_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn show(&mut self) {
        println!("── {} ──", self.name);
        for line in &self.lines {
            println!("{line}");
        }
    }
}

/// What the user typed at a picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickInput {
    /// A row number from the visible list (0-based).
    Row(usize),
    /// Text to narrow the list with; empty restores the full list.
    Filter(String),
    Cancel,
}

/// Interpret one line typed at a picker showing `visible` rows.
pub fn parse_pick_input(line: &str, visible: usize) -> PickInput {
    let line = line.trim();
    match line {
        "q" | ":q" => return PickInput::Cancel,
        "" => return PickInput::Filter(String::new()),
        _ => {}
    }
    match line.parse::<usize>() {
        Ok(row) if row < visible => PickInput::Row(row),
        _ => PickInput::Filter(line.to_string()),
    }
}

/// Indices of the items whose label or description contains `query`,
/// ignoring case.
pub fn filter_items(items: &[QuickPickItem], query: &str) -> Vec<usize> {
    let query = query.to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            query.is_empty()
                || item.label.to_lowercase().contains(&query)
                || item.description.to_lowercase().contains(&query)
        })
        .map(|(index, _)| index)
        .collect()
}

/// Map a typed button number (1-based) to the offered action.
pub fn parse_action(line: &str, actions: &[MessageAction]) -> Option<MessageAction> {
    let choice = line.trim().parse::<usize>().ok()?;
    choice.checked_sub(1).and_then(|i| actions.get(i)).copied()
}

pub struct TerminalHost {
    editor: Editor<(), DefaultHistory>,
    panels: HashMap<String, TerminalPanel>,
}

impl TerminalHost {
    pub fn new() -> Result<Self> {
        let editor = Editor::new().context("Failed to create line editor")?;
        Ok(Self {
            editor,
            panels: HashMap::new(),
        })
    }

    /// Read one line. `None` on Ctrl-C, Ctrl-D or a terminal error.
    pub fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.read_line_with(prompt, "")
    }

    fn read_line_with(&mut self, prompt: &str, initial: &str) -> Option<String> {
        match self.editor.readline_with_initial(prompt, (initial, "")) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                        tracing::warn!("Failed to add history entry: {}", e);
                    }
                }
                Some(line)
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => None,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read from terminal");
                None
            }
        }
    }

    fn show_message(&mut self, label: &str, message: &str, actions: &[MessageAction]) -> Option<MessageAction> {
        println!("{label}{message}");
        if actions.is_empty() {
            return None;
        }
        let buttons: Vec<String> = actions
            .iter()
            .enumerate()
            .map(|(i, action)| format!("[{}] {action}", i + 1))
            .collect();
        println!("{}", buttons.join("  "));
        let line = self.read_line("action (enter to dismiss)> ")?;
        parse_action(&line, actions)
    }
}

impl Host for TerminalHost {
    fn show_quick_pick(&mut self, items: &[QuickPickItem], placeholder: &str) -> Option<usize> {
        let mut visible = filter_items(items, "");
        loop {
            println!("{placeholder}");
            let width = visible
                .iter()
                .map(|&i| items[i].label.chars().count())
                .max()
                .unwrap_or(0);
            for (row, &index) in visible.iter().enumerate() {
                let item = &items[index];
                println!("{row:>4}  {:<width$}  {}", item.label, item.description);
            }
            let line = self.read_line("pick (number, filter text, q)> ")?;
            match parse_pick_input(&line, visible.len()) {
                PickInput::Row(row) => return Some(visible[row]),
                PickInput::Filter(query) => {
                    let matches = filter_items(items, &query);
                    if matches.is_empty() {
                        println!("no members match '{query}'");
                    } else {
                        visible = matches;
                    }
                }
                PickInput::Cancel => return None,
            }
        }
    }

    fn show_input_box(&mut self, options: &InputBoxOptions) -> Option<String> {
        if options.value.is_empty() {
            println!("{}", options.placeholder);
        }
        println!("{}", options.prompt);
        self.read_line_with("> ", &options.value)
    }

    fn show_information_message(
        &mut self,
        message: &str,
        actions: &[MessageAction],
    ) -> Option<MessageAction> {
        self.show_message("", message, actions)
    }

    fn show_error_message(
        &mut self,
        message: &str,
        actions: &[MessageAction],
    ) -> Option<MessageAction> {
        self.show_message("✗ ", message, actions)
    }

    fn update_status_item(&mut self, item: &StatusItem, visible: bool) {
        tracing::debug!(text = %item.text, command = %item.command, visible, "status item");
    }

    fn output_panel(&mut self, name: &str) -> &mut dyn OutputPanel {
        self.panels
            .entry(name.to_string())
            .or_insert_with(|| TerminalPanel {
                name: name.to_string(),
                lines: Vec::new(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<QuickPickItem> {
        [("this", "host"), ("getCommands", "function"), ("version", "string")]
            .iter()
            .map(|(label, description)| QuickPickItem {
                label: label.to_string(),
                description: description.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_parse_pick_input() {
        assert_eq!(parse_pick_input("1", 3), PickInput::Row(1));
        assert_eq!(parse_pick_input(" 2 ", 3), PickInput::Row(2));
        assert_eq!(parse_pick_input("3", 3), PickInput::Filter("3".to_string()));
        assert_eq!(parse_pick_input("ver", 3), PickInput::Filter("ver".to_string()));
        assert_eq!(parse_pick_input("", 3), PickInput::Filter(String::new()));
        assert_eq!(parse_pick_input("q", 3), PickInput::Cancel);
    }

    #[test]
    fn test_filter_items() {
        let items = items();
        assert_eq!(filter_items(&items, ""), vec![0, 1, 2]);
        assert_eq!(filter_items(&items, "COMMAND"), vec![1]);
        assert_eq!(filter_items(&items, "string"), vec![2]);
        assert!(filter_items(&items, "zzz").is_empty());
    }

    #[test]
    fn test_parse_action() {
        let actions = [MessageAction::ReEvaluate, MessageAction::ShowFullOutput];
        assert_eq!(parse_action("1", &actions), Some(MessageAction::ReEvaluate));
        assert_eq!(parse_action("2", &actions), Some(MessageAction::ShowFullOutput));
        assert_eq!(parse_action("0", &actions), None);
        assert_eq!(parse_action("3", &actions), None);
        assert_eq!(parse_action("", &actions), None);
    }

    #[test]
    fn test_panel_clear_and_append() {
        let mut panel = TerminalPanel::default();
        panel.append_line("Expression: 1");
        panel.clear();
        panel.append_line("Output: 2");
        assert_eq!(panel.lines, vec!["Output: 2".to_string()]);
    }
}
