mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{discretize, overlay, travel_times};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .init();

    match &cli.command {
        Commands::Discretize(args) => discretize::run(&cli, args),
        Commands::Overlay(args) => overlay::run(&cli, args),
        Commands::TravelTimes(args) => travel_times::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
