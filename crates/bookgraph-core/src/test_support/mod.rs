//! Test doubles for the provider traits
//!
//! Used by this crate's tests and by the integration tests of the crates
//! above it.

pub mod mocks;
