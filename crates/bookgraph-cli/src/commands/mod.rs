pub mod build;
pub mod config;
pub mod query;
pub mod repl;
pub mod stats;
