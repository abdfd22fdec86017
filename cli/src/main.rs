mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{report, sample};
use tracing_subscriber::EnvFilter;

/// Log to stderr at a level chosen by `-v` count, unless `RUST_LOG` says otherwise.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);
    match &cli.command {
        Commands::Sample(args) => sample::run(&cli, args),
        Commands::Report(args) => report::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
