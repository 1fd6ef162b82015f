//! CLI subcommand implementations.

pub mod api;
pub mod migrate;
