use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    cli::run(cli)
}
