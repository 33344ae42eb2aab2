pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod gemini;
pub mod generate;
pub mod io_utils;
pub mod parser;
pub mod preview;
pub mod profile;
pub mod stats;
pub mod synth;
pub mod table;
pub mod upload;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("datagenesis", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => upload::execute(&args),
        Commands::Profile(args) => profile::execute(&args),
        Commands::Stats(args) => stats::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Describe(args) => preview::execute_describe(&args),
        Commands::Generate(args) => generate::execute(&args),
        Commands::Export(args) => export::execute(&args),
    }
}
