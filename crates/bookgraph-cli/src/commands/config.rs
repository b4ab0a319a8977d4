use anyhow::{bail, Context, Result};
use bookgraph_config::{Config, EXAMPLE_CONFIG, LOCAL_CONFIG_FILE};
use colored::Colorize;
use std::path::PathBuf;

use crate::cli::ConfigCommands;

/// Execute config subcommand
///
/// `config` is only loaded for `show`; `init` must work when the current
/// file is broken.
pub async fn execute(cmd: ConfigCommands, config: impl FnOnce() -> Result<Config>) -> Result<()> {
    match cmd {
        ConfigCommands::Init { path, force } => init(path, force),
        ConfigCommands::Show => show(config()?),
    }
}

/// Initialize a new config file
fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = path.unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));

    if config_path.exists() && !force {
        println!("Use {} to overwrite", "--force".yellow());
        bail!("Config file already exists at: {}", config_path.display());
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&config_path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!(
        "{} Created config file at: {}",
        "Success:".green().bold(),
        config_path.display()
    );
    println!(
        "{}",
        "Default values will be used until you customize the config.".dimmed()
    );
    Ok(())
}

/// Show the current effective configuration with inline keys masked
fn show(mut config: Config) -> Result<()> {
    mask(&mut config.chat.api_key);
    mask(&mut config.embedding.api_key);
    println!("{}", config.to_toml_string()?);
    Ok(())
}

fn mask(key: &mut Option<String>) {
    if key.is_some() {
        *key = Some("********".to_string());
    }
}
