use anyhow::{Context, Result};
use backdater_core::{parse_date, Backdater, BackdaterOptions, Identity, DEFAULT_EMAIL, DEFAULT_NAME};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod console;
mod prompt;

use commands::{commit, interactive, log, status};

#[derive(Parser)]
#[command(name = "backdater")]
#[command(version, about = "Commit files with sequential backdated timestamps", long_about = None)]
struct Cli {
    /// Repository directory (initialized if it is not a repository yet)
    #[arg(short = 'C', long, default_value = ".", global = true)]
    dir: PathBuf,

    /// State file holding the last commit date [default: <DIR>/commit_config.json]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Author and committer name
    #[arg(long, default_value = DEFAULT_NAME, global = true)]
    name: String,

    /// Author and committer email
    #[arg(long, default_value = DEFAULT_EMAIL, global = true)]
    email: String,

    /// First date (YYYY-MM-DD) to use when no date is stored yet
    #[arg(long, value_parser = parse_start_date, global = true)]
    start_date: Option<NaiveDate>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Commit an existing file at the next date in the sequence
    Commit {
        /// File to commit, relative to the repository directory
        path: PathBuf,

        /// Commit message (defaults to "Updated <PATH>")
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show the stored date and the next date that will be used
    Status,

    /// Show commit history
    Log {
        /// Number of commits to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn parse_start_date(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("expected a date as YYYY-MM-DD, got {s:?}"))
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "backdater=debug,backdater_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut options = BackdaterOptions::new(&cli.dir).with_identity(Identity::new(cli.name, cli.email));
    if let Some(config) = cli.config {
        options = options.with_state_path(config);
    }

    let mut backdater = Backdater::initialize(options)
        .with_context(|| format!("Failed to start backdater in {}", cli.dir.display()))?;
    let mut console = console::stdio();

    match cli.command {
        None => {
            interactive::startup(&backdater, console.as_mut())?;
            interactive::run(&mut backdater, console.as_mut(), cli.start_date)?;
        }
        Some(Commands::Commit { path, message }) => {
            backdater.ensure_identity().context("Error setting up git config")?;
            commit::run(
                &mut backdater,
                console.as_mut(),
                &path,
                message.as_deref(),
                cli.start_date,
            )?;
        }
        Some(Commands::Status) => {
            status::run(&backdater)?;
        }
        Some(Commands::Log { limit }) => {
            log::run(&backdater, limit)?;
        }
    }

    Ok(())
}
