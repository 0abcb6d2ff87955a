// CLI interface: clap derive over the demo host API

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use probe_eval::evaluate;
use probe_explorer::{ConfigStore, Configuration, Explorer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod demo;
mod members;
mod repl;
mod terminal;

use repl::{Flow, Repl};
use terminal::TerminalHost;

#[derive(Parser)]
#[command(name = "probe", version, about = "Browse and evaluate a host API")]
struct Cli {
    /// Settings file (JSON with includePrototype, includePrivate, showAPIShortcut)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Flags applied on top of the settings file.
#[derive(Args, Debug, Default)]
struct Overrides {
    /// List `__`-prefixed members
    #[arg(long, global = true)]
    include_prototype: bool,

    /// Hide `_`-prefixed members
    #[arg(long, global = true)]
    exclude_private: bool,

    /// Hide the status item
    #[arg(long, global = true)]
    hide_shortcut: bool,
}

impl Overrides {
    fn apply(&self, mut config: Configuration) -> Configuration {
        if self.include_prototype {
            config.include_prototype = true;
        }
        if self.exclude_private {
            config.include_private = false;
        }
        if self.hide_shortcut {
            config.show_api_shortcut = false;
        }
        config
    }
}

#[derive(Subcommand)]
enum Command {
    /// Browse the host API and evaluate the chosen member
    Pick,
    /// Evaluate an expression (prompts when none is given)
    Eval {
        expression: Option<String>,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive session
    Repl,
    /// List the members at a path
    Members {
        path: Option<String>,
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    // Respects RUST_LOG; logs go to stderr so results stay pipeable.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.overrides.apply(load_settings(cli.settings.as_deref())?);
    tracing::debug!(?config, "settings loaded");
    let explorer = Explorer::new(demo::host_root(), demo::ROOT_NAME, ConfigStore::new(config));

    match cli.command.unwrap_or(Command::Repl) {
        Command::Pick => {
            let mut host = TerminalHost::new()?;
            explorer.activate(&mut host);
            let outcome = explorer.pick_expression(&mut host);
            explorer.dispose(&mut host);
            Ok(exit_code(outcome?.map_or(true, |o| o.succeeded)))
        }
        Command::Eval {
            expression: Some(expression),
            json,
        } => {
            let outcome = evaluate(&expression, explorer.environment());
            if json {
                println!(
                    "{}",
                    serde_json::to_string(&outcome).context("Failed to serialize outcome")?
                );
            } else {
                println!("{}", outcome.rendered_text);
            }
            Ok(exit_code(outcome.succeeded))
        }
        Command::Eval {
            expression: None,
            json,
        } => {
            let mut host = TerminalHost::new()?;
            let outcome = explorer.evaluate(&mut host);
            if let (true, Some(outcome)) = (json, &outcome) {
                println!(
                    "{}",
                    serde_json::to_string(outcome).context("Failed to serialize outcome")?
                );
            }
            Ok(exit_code(outcome.map_or(true, |o| o.succeeded)))
        }
        Command::Members { path, json } => {
            let path = path.unwrap_or_else(|| demo::ROOT_NAME.to_string());
            let listing = if json {
                members::render_json(&explorer, &path)?
            } else {
                members::render(&explorer, &path)?
            };
            println!("{listing}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Repl => {
            run_repl(explorer, cli.settings)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<Configuration> {
    match path {
        Some(path) => Configuration::load(path).context("Failed to load settings"),
        None => Ok(Configuration::default()),
    }
}

fn exit_code(succeeded: bool) -> ExitCode {
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_repl(explorer: Explorer, settings: Option<PathBuf>) -> Result<()> {
    println!("probe v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "The host API is bound as '{}'. Type :help for commands, :quit to exit.",
        demo::ROOT_NAME
    );

    let mut host = TerminalHost::new()?;
    explorer.activate(&mut host);
    let mut repl = Repl::new(explorer, host, settings);

    while let Some(line) = repl.host_mut().read_line("probe> ") {
        match repl.process_line(&line) {
            Ok(Flow::Continue(Some(output))) => println!("{output}"),
            Ok(Flow::Continue(None)) => {}
            Ok(Flow::Exit) => break,
            Err(e) => eprintln!("Error: {e:#}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::HELP_TEXT;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_eval_with_flags() {
        let cli = Cli::parse_from(["probe", "--exclude-private", "eval", "1 + 1", "--json"]);
        assert!(cli.overrides.exclude_private);
        match cli.command {
            Some(Command::Eval { expression, json }) => {
                assert_eq!(expression.as_deref(), Some("1 + 1"));
                assert!(json);
            }
            _ => panic!("expected eval"),
        }
    }

    #[test]
    fn test_overrides_apply_over_settings() {
        let overrides = Overrides {
            include_prototype: true,
            exclude_private: true,
            hide_shortcut: false,
        };
        let config = overrides.apply(Configuration::default());
        assert!(config.include_prototype);
        assert!(!config.include_private);
        assert!(config.show_api_shortcut);
        assert_eq!(Overrides::default().apply(config), config);
    }

    #[test]
    fn test_help_lists_commands() {
        for command in [":pick", ":members", ":set", ":reload", ":quit"] {
            assert!(HELP_TEXT.contains(command), "{command} missing from help");
        }
    }
}
