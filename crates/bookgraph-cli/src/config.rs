//! Effective configuration for a CLI invocation

use anyhow::{Context, Result};
use bookgraph_config::{Config, ConfigLoader};

use crate::cli::{BuildArgs, Cli};

/// Load the config file and environment, then apply global flags
pub fn load(cli: &Cli) -> Result<Config> {
    let mut config = ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    apply_global_flags(&mut config, cli);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn apply_global_flags(config: &mut Config, cli: &Cli) {
    if let Some(model) = &cli.chat_model {
        config.chat.model = model.clone();
    }
    if let Some(url) = &cli.embedding_url {
        config.embedding.endpoint = Some(url.clone());
    }
    if let Some(model) = &cli.embedding_model {
        config.embedding.model = model.clone();
    }
}

/// Apply `build` flags on top of the loaded configuration
pub fn apply_build_args(config: &mut Config, args: &BuildArgs) -> Result<()> {
    if let Some(input) = &args.input {
        config.storage.data_file = input.clone();
    }
    if let Some(output) = &args.output {
        config.storage.persist_dir = output.clone();
    }
    if let Some(concurrency) = args.concurrency {
        config.extraction.concurrency = concurrency;
    }
    if let Some(max) = args.max_triplets {
        config.extraction.max_triplets_per_record = max;
    }
    config.validate().context("Invalid build options")?;
    Ok(())
}
