use anyhow::Result;
use backdater_core::Backdater;
use colored::Colorize;

pub fn run(backdater: &Backdater, limit: Option<usize>) -> Result<()> {
    // One extra commit tells whether anything was cut off.
    let mut commits = backdater.history(limit.map(|n| n.saturating_add(1)))?;
    let truncated = limit.is_some_and(|n| commits.len() > n);
    if let Some(n) = limit {
        commits.truncate(n);
    }

    if commits.is_empty() {
        println!("{}", "No commits yet".yellow());
        return Ok(());
    }

    println!("{}", "Commit History".bold().cyan());
    println!();

    for commit in &commits {
        println!("{} {}", "commit".yellow().bold(), commit.id.yellow());
        println!("{}: {}", "Author".bold(), commit.author);
        println!(
            "{}: {}",
            "Date".bold(),
            commit.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
        println!();
        println!("    {}", commit.summary);
        println!();
    }

    if truncated {
        println!("{}", "... and more commits".dimmed());
        println!("Use {} to see more", "--limit N".cyan());
    }

    Ok(())
}
