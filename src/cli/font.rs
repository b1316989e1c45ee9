//! Title proofing command (`papertape font ...`).

use anyhow::{Result, bail};
use clap::Args;
use papertape::ascii_tape;

use crate::cli::common::HoleStyleArg;

/// Args for `papertape font`.
#[derive(Args, Debug)]
pub struct FontArgs {
    /// Text to transpose into punch rows.
    pub text: String,
    /// Tracks shown per row (5, 7 or 8).
    #[arg(long, default_value_t = 8)]
    pub bit_count: u8,
    /// Characters used for punched and blank positions.
    #[arg(long, default_value_t = HoleStyleArg::AsciiO, value_enum)]
    pub style: HoleStyleArg,
}

/// Print the tape a title would produce, one row per line.
pub fn handle(args: FontArgs) -> Result<()> {
    if !matches!(args.bit_count, 5 | 7 | 8) {
        bail!("unsupported bit count {} (expected 5, 7 or 8)", args.bit_count);
    }
    let (mark, blank) = args.style.marks();
    print!("{}", ascii_tape(&args.text, args.bit_count, mark, blank));
    Ok(())
}
