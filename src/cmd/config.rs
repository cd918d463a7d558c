//! Configuration view and validation commands — `buildmate config`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use buildmate::config::{BuildmateToml, CONFIG_FILE_NAME, locate_config, user_config_path};

use super::super::ConfigCommands;

pub fn cmd_config(explicit: Option<&Path>, command: Option<ConfigCommands>) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => show(explicit),
        Some(ConfigCommands::Validate) => validate(explicit),
        Some(ConfigCommands::Init { user }) => init(explicit, user),
    }
}

/// The file that would be loaded, if it exists.
fn existing_config(explicit: Option<&Path>) -> Option<PathBuf> {
    locate_config(explicit).filter(|p| p.exists())
}

fn show(explicit: Option<&Path>) -> Result<()> {
    println!();
    println!("BuildMate Configuration");
    println!("=======================");
    println!();

    let mut toml = match existing_config(explicit) {
        Some(path) => {
            println!("Config file: {}", path.display());
            BuildmateToml::load(&path)?
        }
        None => {
            println!("No {} found. Using defaults.", CONFIG_FILE_NAME);
            println!("Run 'buildmate config init' to create one.");
            BuildmateToml::default()
        }
    };
    toml.apply_env()?;

    println!();
    println!("Effective values (with environment overrides):");
    println!();
    let rendered = toml::to_string_pretty(&toml).context("Failed to render configuration")?;
    for line in rendered.lines() {
        println!("  {}", line);
    }
    println!();
    Ok(())
}

fn validate(explicit: Option<&Path>) -> Result<()> {
    println!();
    println!("Validating configuration...");
    println!();

    let Some(path) = existing_config(explicit) else {
        println!("No {} found. Using defaults (valid).", CONFIG_FILE_NAME);
        return Ok(());
    };

    let toml = BuildmateToml::load(&path)?;
    let warnings = toml.validate();
    if warnings.is_empty() {
        println!("Configuration is valid.");
    } else {
        println!("Configuration warnings:");
        for warning in warnings {
            println!("  - {}", warning);
        }
    }
    println!();
    Ok(())
}

fn init(explicit: Option<&Path>, user: bool) -> Result<()> {
    let path = match (explicit, user) {
        (Some(path), _) => path.to_path_buf(),
        (None, true) => user_config_path().context("Could not determine the user config directory")?,
        (None, false) => PathBuf::from(CONFIG_FILE_NAME),
    };

    if path.exists() {
        println!("{} already exists at {}", CONFIG_FILE_NAME, path.display());
        println!("Delete it first if you want to recreate it.");
        return Ok(());
    }

    BuildmateToml::default().save(&path)?;

    println!("Created {} at {}", CONFIG_FILE_NAME, path.display());
    println!();
    println!("You can now customize:");
    println!("  - [service] base_url, timeout_secs");
    println!("  - [pricing] conversion_rate, currency_symbol");
    println!("  - [chat] endpoint, models and prompt files");
    println!();
    Ok(())
}
