//! Configuration CLI commands.
//!
//! Provides `config path`, `config show` and `config init`.

use std::path::PathBuf;

use arealink::config::{config_file_path, ConfigFile};
use clap::Subcommand;

use super::common::GlobalOptions;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective settings, including command-line overrides
    Show,

    /// Write a config file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(options: &GlobalOptions, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(options),
        ConfigCommands::Show => run_show(options),
        ConfigCommands::Init { force } => run_init(options, force),
    }
}

fn target_path(options: &GlobalOptions) -> Result<PathBuf, CliError> {
    match &options.config {
        Some(path) => Ok(path.clone()),
        None => Ok(config_file_path()?),
    }
}

/// Show the configuration file path.
fn run_path(options: &GlobalOptions) -> Result<(), CliError> {
    let path = target_path(options)?;
    println!("{}", path.display());
    if !path.exists() {
        println!("(file does not exist, defaults are used)");
    }
    Ok(())
}

/// Show the effective configuration as INI.
fn run_show(options: &GlobalOptions) -> Result<(), CliError> {
    let mut config = options.load_config()?;
    config.relay = options.relay_config(&config);
    print!("{}", config.to_ini_string()?);
    Ok(())
}

/// Write the default configuration.
fn run_init(options: &GlobalOptions, force: bool) -> Result<(), CliError> {
    let path = target_path(options)?;
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        )));
    }
    ConfigFile::default().save_to(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        let options = GlobalOptions {
            config: Some(path.clone()),
            relay_url: None,
        };

        run_init(&options, false).unwrap();
        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());

        assert!(matches!(run_init(&options, false), Err(CliError::Config(_))));
        run_init(&options, true).unwrap();
    }
}
