//! Command-line interface wiring for the `papertape` binary.
//!
//! This module owns the clap definitions and hands each command to the
//! submodule that implements it.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod common;
pub mod font;
pub mod listing;
pub mod render;
pub mod utils;

use common::LogLevelArg;

/// Parsed CLI entrypoint for the `papertape` binary.
#[derive(Parser, Debug)]
#[command(
    name = "papertape",
    version,
    about = "Render binary data as printable punched paper tape"
)]
pub struct Cli {
    /// Diagnostics written to stderr at this level and above.
    #[arg(long, global = true, default_value_t = LogLevelArg::Info, value_enum)]
    pub log_level: LogLevelArg,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lay out a file as tape on SVG pages.
    Render(render::RenderArgs),
    /// Turn a PDP-11 assembler listing into a SIMH deposit script.
    Lst2simh(listing::ListingArgs),
    /// Show the punch rows a title would produce.
    Font(font::FontArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render(args) => render::handle(args),
        Command::Lst2simh(args) => listing::handle(args),
        Command::Font(args) => font::handle(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_flags_parse() {
        let cli = Cli::try_parse_from([
            "papertape",
            "--log-level",
            "debug",
            "render",
            "boot.bin",
            "-o",
            "out/tape.svg",
            "--page-size",
            "letter",
            "--bit-count",
            "5",
            "--reverse",
            "--dec-arrows",
        ])
        .unwrap();
        assert!(matches!(cli.log_level, LogLevelArg::Debug));
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.bit_count, Some(5));
        assert!(args.reverse && args.dec_arrows && !args.cut_marks);
        assert_eq!(args.output.to_str(), Some("out/tape.svg"));
    }
}
