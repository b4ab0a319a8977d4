//! Bookgraph CLI library
//!
//! Command implementations for the `bookgraph` binary, exposed as a library
//! so the REPL and the provider wiring can be exercised from tests.

pub mod cli;
pub mod commands;
pub mod config;
pub mod factories;
pub mod output;
