use anyhow::{Context, Result};
use backdater_core::{Backdater, RepoOrigin};
use chrono::NaiveDate;
use colored::Colorize;
use std::fs;
use std::ops::ControlFlow;
use std::path::Path;

use super::commit::{commit_and_report, file_exists};
use crate::console::Console;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    CreateFile,
    ExistingFile,
    Exit,
}

impl MenuChoice {
    fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "1" => Some(MenuChoice::CreateFile),
            "2" => Some(MenuChoice::ExistingFile),
            "3" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Reports how the repository was obtained and applies the configured
/// identity. A failure to write the identity is printed, not returned.
pub fn startup(backdater: &Backdater, console: &mut dyn Console) -> Result<()> {
    match backdater.origin() {
        RepoOrigin::Opened => console.say("Repository already exists!")?,
        RepoOrigin::Initialized => console.say(&"Initialized new Git repository".green().to_string())?,
    }

    if let Err(e) = backdater.ensure_identity() {
        console.say(&format!("Error setting up git config: {}", e).red().to_string())?;
    }

    Ok(())
}

/// Runs the menu until the user exits or input ends.
pub fn run(backdater: &mut Backdater, console: &mut dyn Console, start_date: Option<NaiveDate>) -> Result<()> {
    loop {
        console.say("")?;
        console.say("1. Create and commit new file")?;
        console.say("2. Commit existing file")?;
        console.say("3. Exit")?;
        console.say("")?;

        let Some(choice) = console.read_line("Enter your choice (1-3)")? else {
            break;
        };

        let flow = match MenuChoice::parse(&choice) {
            Some(MenuChoice::CreateFile) => create_and_commit(backdater, console, start_date)?,
            Some(MenuChoice::ExistingFile) => commit_existing(backdater, console, start_date)?,
            Some(MenuChoice::Exit) => ControlFlow::Break(()),
            None => {
                console.say(&"Invalid choice! Please try again.".yellow().to_string())?;
                ControlFlow::Continue(())
            }
        };

        if flow.is_break() {
            break;
        }
    }

    console.say("Exiting...")?;
    Ok(())
}

fn create_and_commit(
    backdater: &mut Backdater,
    console: &mut dyn Console,
    start_date: Option<NaiveDate>,
) -> Result<ControlFlow<()>> {
    let Some(name) = console.read_line("Enter new file name")? else {
        return Ok(ControlFlow::Break(()));
    };
    let Some(content) = console.read_line("Enter file content")? else {
        return Ok(ControlFlow::Break(()));
    };

    let path = backdater.workdir()?.join(&name);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    commit_and_report(backdater, console, &name, start_date)?;
    Ok(ControlFlow::Continue(()))
}

fn commit_existing(
    backdater: &mut Backdater,
    console: &mut dyn Console,
    start_date: Option<NaiveDate>,
) -> Result<ControlFlow<()>> {
    let Some(name) = console.read_line("Enter existing file name")? else {
        return Ok(ControlFlow::Break(()));
    };

    if file_exists(backdater.workdir()?, Path::new(&name)) {
        commit_and_report(backdater, console, &name, start_date)?;
    } else {
        console.say(&"File does not exist!".red().to_string())?;
    }

    Ok(ControlFlow::Continue(()))
}
