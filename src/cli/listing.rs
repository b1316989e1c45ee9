//! Listing conversion command (`papertape lst2simh ...`).

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use papertape::convert_listing;
use tracing::info;

use crate::cli::utils::{ensure_parent, read_bytes};

/// Args for `papertape lst2simh`.
#[derive(Args, Debug)]
pub struct ListingArgs {
    /// Assembler listing (`-` for stdin).
    #[arg(default_value = "-")]
    pub listing: PathBuf,
    /// SIMH script to write (`-` for stdout).
    #[arg(short = 'o', long = "output", default_value = "-")]
    pub output: PathBuf,
}

/// Execute the listing conversion.
pub fn handle(args: ListingArgs) -> Result<()> {
    let listing = read_bytes(&args.listing)?;
    let words = if args.output.as_os_str() == "-" {
        convert_listing(listing.as_slice(), io::stdout().lock())
    } else {
        ensure_parent(&args.output)?;
        let file = File::create(&args.output)
            .with_context(|| format!("failed to create {}", args.output.display()))?;
        convert_listing(listing.as_slice(), BufWriter::new(file))
    }
    .with_context(|| format!("failed to convert {}", args.listing.display()))?;
    info!(words, "listing converted");
    Ok(())
}
