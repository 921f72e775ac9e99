//! Subcommand implementations

pub mod generate;
pub mod info;
