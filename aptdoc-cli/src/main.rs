use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

mod error;
mod subcommands;

/// Parses APT documents and converts them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert APT documents to canonical APT or an event dump
    Convert(subcommands::convert::Args),

    /// Print the event stream of an APT document as a tree
    Inspect(subcommands::inspect::Args),
}

fn main() -> miette::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Convert(args) => subcommands::convert::run(args),
        Command::Inspect(args) => subcommands::inspect::run(args),
    }
}
