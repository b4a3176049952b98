//! Configuration management CLI commands.
//!
//! Provides `config path`, `config list` and `config init` for inspecting
//! and creating the configuration file.

use std::path::Path;

use clap::Subcommand;
use console::style;
use gfwalk::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// List all configuration settings in effect
    List,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
///
/// `explicit` is the path given with `--config`, if any.
pub fn run(command: ConfigCommands, explicit: Option<&Path>) -> Result<(), CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config_file_path()?,
    };

    match command {
        ConfigCommands::Path => run_path(&path),
        ConfigCommands::List => run_list(&path),
        ConfigCommands::Init { force } => run_init(&path, force),
    }
}

/// Show the configuration file path.
fn run_path(path: &Path) -> Result<(), CliError> {
    println!("{}", path.display());
    Ok(())
}

/// List all configuration settings.
fn run_list(path: &Path) -> Result<(), CliError> {
    let config = load_or_default(path)?;

    println!("Configuration Settings");
    println!("======================");
    if !path.exists() {
        println!("{}", style("(no file, showing defaults)").dim());
    }
    println!();

    let mut current_section = String::new();
    for (key, value) in config.entries() {
        let (section, name) = key.split_once('.').unwrap_or(("", key.as_str()));

        // Print section header when section changes
        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section.to_string();
        }

        println!("  {} = {}", name, value);
    }
    Ok(())
}

/// Write the defaults to `path`.
fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        )));
    }
    ConfigFile::default().save_to(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn load_or_default(path: &Path) -> Result<ConfigFile, CliError> {
    if path.exists() {
        Ok(ConfigFile::load_from(path)?)
    } else {
        Ok(ConfigFile::default())
    }
}
