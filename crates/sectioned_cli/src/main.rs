//! Text presenter for the sectioned query sample.
//!
//! # Responsibility
//! - Run demo commands against a record store in order.
//! - Print the derived sections after every command.
//!
//! Any failure stops the run with a non-zero exit status.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use sectioned_core::{
    default_log_level, init_logging, LoggingConfig, ModelContext, SampleService, Section,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "sectioned_cli", version, about = "Sectioned query sample")]
struct Cli {
    /// SQLite database file; an in-memory store is used when omitted.
    #[arg(long, env = "SECTIONED_DB")]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long, env = "SECTIONED_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[arg(long, env = "SECTIONED_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print sections as JSON instead of text.
    #[arg(long)]
    json: bool,

    #[arg(value_enum, required = true)]
    commands: Vec<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Command {
    /// Replace all data with the sample items.
    Load,
    /// Swap the order of the first two items.
    Swap,
    /// Toggle item sort between forward and reverse.
    ItemSort,
    /// Toggle the first-attribute filter.
    Filter,
    /// Print sections without changing anything.
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let config = LoggingConfig {
            level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: log_dir.clone(),
        };
        init_logging(&config).context("failed to initialize logging")?;
    }

    let context = match &cli.db {
        Some(path) => ModelContext::open(path)
            .with_context(|| format!("failed to open record store `{}`", path.display()))?,
        None => ModelContext::open_in_memory().context("failed to open in-memory store")?,
    };
    let mut service = SampleService::new(context)?;

    for command in &cli.commands {
        run_command(&mut service, *command)
            .with_context(|| format!("command `{command:?}` failed"))?;
        render(&cli, *command, service.current_sections())?;
    }
    Ok(())
}

fn run_command(service: &mut SampleService, command: Command) -> Result<()> {
    info!("event=cli_command module=cli status=start command={command:?}");
    match command {
        Command::Load => {
            service.load()?;
        }
        Command::Swap => {
            if !service.swap()? {
                eprintln!("swap skipped: fewer than two items");
            }
        }
        Command::ItemSort => {
            service.toggle_item_sort()?;
        }
        Command::Filter => {
            service.toggle_attribute_filter()?;
        }
        Command::Show => {}
    }
    Ok(())
}

fn render(cli: &Cli, command: Command, sections: &[Section]) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string(sections)?);
        return Ok(());
    }

    println!("== {command:?}");
    for section in sections {
        println!("Section for Item '{}'", section.id);
        for record in &section.items {
            println!("  {}", record.label());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_command_sequence() {
        let cli = Cli::try_parse_from(["sectioned_cli", "load", "swap", "item-sort", "filter"])
            .unwrap();
        assert_eq!(
            cli.commands,
            [
                Command::Load,
                Command::Swap,
                Command::ItemSort,
                Command::Filter
            ]
        );
        assert!(!cli.json);
    }

    #[test]
    fn rejects_empty_command_list() {
        assert!(Cli::try_parse_from(["sectioned_cli"]).is_err());
    }
}
