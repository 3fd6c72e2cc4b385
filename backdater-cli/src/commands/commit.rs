use anyhow::{Context, Result};
use backdater_core::{format_date, Backdater, CommitReport};
use chrono::NaiveDate;
use colored::Colorize;
use std::io;
use std::path::Path;
use tracing::warn;

use crate::console::Console;
use crate::prompt;

/// `backdater commit <PATH>`: commit one existing file and exit.
pub fn run(
    backdater: &mut Backdater,
    console: &mut dyn Console,
    path: &Path,
    message: Option<&str>,
    start_date: Option<NaiveDate>,
) -> Result<()> {
    if !file_exists(backdater.workdir()?, path) {
        anyhow::bail!("File does not exist: {}", path.display());
    }

    let report = backdater
        .commit_file(path, message, || prompt::start_date(console, start_date))
        .context("Error committing file")?;

    print_report(console, &report)?;
    console.say(&format!("  {}: {}", "Commit".bold(), report.id))?;
    console.say(&format!("  {}: {}", "Message".bold(), report.message))?;

    Ok(())
}

/// An empty name never exists, even though joining it yields the work
/// directory itself.
pub fn file_exists(workdir: &Path, name: &Path) -> bool {
    !name.as_os_str().is_empty() && workdir.join(name).exists()
}

/// Commits `name` from the interactive loop.
///
/// Failures are printed and swallowed so the loop keeps going; only console
/// I/O errors are returned.
pub fn commit_and_report(
    backdater: &mut Backdater,
    console: &mut dyn Console,
    name: &str,
    start_date: Option<NaiveDate>,
) -> io::Result<()> {
    let result = backdater.commit_file(Path::new(name), None, || prompt::start_date(console, start_date));

    match result {
        Ok(report) => print_report(console, &report),
        Err(e) => {
            warn!("Commit of {:?} failed: {}", name, e);
            console.say(&format!("Error committing file: {}", e).red().to_string())
        }
    }
}

fn print_report(console: &mut dyn Console, report: &CommitReport) -> io::Result<()> {
    console.say(
        &format!(
            "Successfully committed {} with date: {}",
            report.path.display(),
            format_date(report.date)
        )
        .green()
        .to_string(),
    )
}
