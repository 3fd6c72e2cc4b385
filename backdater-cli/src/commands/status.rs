use anyhow::Result;
use backdater_core::{format_date, Backdater};
use colored::Colorize;

pub fn run(backdater: &Backdater) -> Result<()> {
    let state = backdater.state();
    let identity = backdater.identity();

    println!("{}", "Backdater Status".bold().cyan());
    println!("  {}: {}", "Repository".bold(), backdater.workdir()?.display());
    println!("  {}: {}", "State file".bold(), backdater.state_path().display());
    println!("  {}: {} <{}>", "Identity".bold(), identity.name, identity.email);
    println!();

    match state.last_commit_date() {
        Some(last) => {
            println!("  {}: {}", "Last commit date".bold(), format_date(last));
            match state.peek_next() {
                Some(next) => println!("  {}: {}", "Next commit date".bold(), format_date(next).green()),
                None => println!("  {}: {}", "Next commit date".bold(), "none".red()),
            }
        }
        None => {
            println!("  {}: {}", "Last commit date".bold(), "not set".yellow());
            println!(
                "  {}: {}",
                "Next commit date".bold(),
                "asked for on the first commit".dimmed()
            );
        }
    }

    let commits = backdater.history(None)?;
    println!();
    println!("  {}: {}", "Commits".bold(), commits.len());

    Ok(())
}
