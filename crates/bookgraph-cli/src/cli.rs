use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "bookgraph")]
#[command(about = "bookgraph - knowledge-graph book recommendations over a CSV of summaries")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, RUST_LOG is used, else 'warn'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ./bookgraph.toml, then ~/.config/bookgraph/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Chat model name (overrides config file)
    #[arg(long, global = true)]
    pub chat_model: Option<String>,

    /// Embedding service URL (overrides config file)
    #[arg(long, global = true)]
    pub embedding_url: Option<String>,

    /// Embedding model name (overrides config file)
    #[arg(long, global = true)]
    pub embedding_model: Option<String>,
}

impl Cli {
    /// Effective log level; `None` defers to `RUST_LOG`
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.verbose {
            Some(LogLevel::Debug)
        } else {
            self.log_level
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract triplets and embeddings from the CSV and persist the index
    Build(BuildArgs),

    /// Answer questions against a persisted index
    Query(QueryArgs),

    /// Show index statistics
    Stats(StatsArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
    /// CSV with book_id, book_name and book_summary columns
    #[arg(short, long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Directory the index is written to
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Extraction requests in flight at once
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Maximum triplets kept per record
    #[arg(long)]
    pub max_triplets: Option<usize>,
}

#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    /// Directory holding the index
    #[arg(long, value_name = "DIR")]
    pub index: Option<PathBuf>,

    /// Number of records matched per question
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// One-shot question (if omitted, starts interactive mode)
    #[arg(short, long)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct StatsArgs {
    /// Directory holding the index
    #[arg(long, value_name = "DIR")]
    pub index: Option<PathBuf>,

    /// Number of most connected entities to list
    #[arg(long, default_value = "10")]
    pub top: usize,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommands {
    /// Write an example config file
    Init {
        /// Path for the config file (default: ./bookgraph.toml)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,
}
