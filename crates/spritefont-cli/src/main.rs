//! Spritefont CLI: generate sprite fonts and inspect saved ones

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match &cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}

/// Warnings by default, more with each `-v`; RUST_LOG wins when set
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
