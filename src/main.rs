//! osbs
//!
//! Finds and creates os-bs checkouts under the user's git directory. The binary
//! prints the directory to switch into; the functions from `osbs init` do the
//! actual `cd` in the calling shell.

mod config;
mod git;
mod repo;
mod shell;

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use config::{ConfigTable, Settings};
use git::SystemRunner;
use shell::Shell;

/// Locate and clone os-bs checkouts
#[derive(Parser, Debug)]
#[command(name = "osbs")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, short_alias = 'd', alias = "debug", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print `<git dir>/<repo-name>/os-bs`, or the current work tree's top level
    Locate {
        /// Repository name (at most one)
        #[arg(value_name = "REPO_NAME")]
        args: Vec<String>,
    },
    /// Clone os-bs into a new `<git dir>/<name>` and print the checkout
    Clone {
        /// Directory to create (exactly one)
        #[arg(value_name = "NAME")]
        args: Vec<String>,
    },
    /// Print the git directory
    GitDir,
    /// Query the user config file
    Config {
        #[command(subcommand)]
        query: ConfigQuery,
    },
    /// Print shell functions that cd into the printed directories
    Init {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigQuery {
    /// List the sections
    Sections,
    /// List the items in a section
    Items { section: String },
    /// Print one item
    Get { section: String, item: String },
}

fn main() -> ExitCode {
    // Usage errors exit 1 like every other failure; help and version exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // stdout carries paths for the shell wrappers, so logs go to stderr
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level.as_str())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    debug!("osbs v{}", env!("CARGO_PKG_VERSION"));

    match run(cli.command) {
        Ok(output) => {
            if !output.is_empty() {
                let mut stdout = std::io::stdout().lock();
                let written = stdout
                    .write_all(&os_bytes(output))
                    .and_then(|_| stdout.write_all(b"\n"));
                if written.is_err() {
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Raw bytes of `s`, so non-UTF-8 paths reach the shell intact
#[cfg(unix)]
fn os_bytes(s: OsString) -> Vec<u8> {
    use std::os::unix::ffi::OsStringExt;
    s.into_vec()
}

#[cfg(not(unix))]
fn os_bytes(s: OsString) -> Vec<u8> {
    s.to_string_lossy().into_owned().into_bytes()
}

fn home() -> anyhow::Result<PathBuf> {
    config::home_dir().ok_or_else(|| anyhow!("Couldn't determine the home directory"))
}

fn settings() -> anyhow::Result<Settings> {
    Ok(Settings::load(&home()?)?)
}

fn run(command: Command) -> anyhow::Result<OsString> {
    let output = match command {
        Command::Locate { args } => {
            let settings = settings()?;
            let cwd = std::env::current_dir().context("Couldn't read the current directory")?;
            repo::locate(&SystemRunner, &settings, &cwd, &args)?.into_os_string()
        }
        Command::Clone { args } => {
            let settings = settings()?;
            repo::clone_checkout(&SystemRunner, &settings, &args)?.into_os_string()
        }
        Command::GitDir => repo::ensure_git_dir(&settings()?)?.into_os_string(),
        Command::Config { query } => {
            let table = ConfigTable::load(&home()?)?;
            let text = match query {
                ConfigQuery::Sections => table.sections().join("\n"),
                ConfigQuery::Items { section } => table.items(&section)?.join("\n"),
                ConfigQuery::Get { section, item } => table.get(&section, &item)?,
            };
            text.into()
        }
        Command::Init { shell } => shell::render(shell, env!("CARGO_PKG_NAME")).into(),
    };
    Ok(output)
}
