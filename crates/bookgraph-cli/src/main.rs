use anyhow::Result;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use bookgraph_cli::{
    cli::{Cli, Commands},
    commands, config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Commands::Config(ref cmd) => commands::config::execute(cmd.clone(), || config::load(&cli)).await,
        Commands::Build(ref args) => commands::build::execute(config::load(&cli)?, args.clone()).await,
        Commands::Query(ref args) => commands::query::execute(config::load(&cli)?, args.clone()).await,
        Commands::Stats(ref args) => commands::stats::execute(config::load(&cli)?, args.clone()).await,
    }
}

/// Logs go to stderr; stdout is reserved for answers and tables
fn init_logging(cli: &Cli) {
    let filter = match cli.effective_log_level() {
        Some(level) => crate_filter(level.into()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| crate_filter(LevelFilter::WARN)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn crate_filter(level: LevelFilter) -> EnvFilter {
    let directives = ["bookgraph_cli", "bookgraph_core", "bookgraph_llm", "bookgraph_config"]
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",");
    EnvFilter::new(format!("warn,{}", directives))
}
