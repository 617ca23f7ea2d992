use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use covidmap::cli::{Cli, Commands};
use covidmap::commands::{download, info, render};

/// `-v` raises the default level to debug, `-vv` to trace. `RUST_LOG` wins over both.
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match &cli.command {
        Commands::Download(args) => download::run(&cli, args),
        Commands::Render(args) => render::run(&cli, args),
        Commands::Range => info::range(&cli),
        Commands::Gradients => info::gradients(),
    }
}
