//! Converts a PDP-11 assembler listing into a SIMH command script that
//! deposits the assembled words into memory.

use std::io::{self, BufRead, Write};

use thiserror::Error;

const DATA_START: usize = 9;
const DATA_END: usize = 40;
/// Highest byte address on a PDP-11 with 22-bit addressing.
const MAX_ADDRESS: u32 = 0o17_777_777;

const PREAMBLE: &str = "SET CPU 11/70,4M
;SET REALCONS=localhost
;SET REALCONS panel=11/70
;SET REALCONS interval=8
;SET REALCONS connected


";

const POSTAMBLE: &str = "

RESET ALL
SET CPU IDLE
D PSW 000340
D PC  000000
E PC
echo \"RUN to start from PC\"

";

#[derive(Debug, Error)]
pub enum ListingError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("line {line}: '{token}' is not an octal address")]
    BadAddress { line: usize, token: String },
    #[error("line {line}: address {address:o} is beyond the 22-bit address space")]
    AddressOutOfRange { line: usize, address: u32 },
}

/// Stream `listing` into SIMH deposit commands on `out`. Returns the number of
/// words deposited.
pub fn convert_listing<R: BufRead, W: Write>(listing: R, mut out: W) -> Result<usize, ListingError> {
    out.write_all(PREAMBLE.as_bytes())?;
    let mut deposited = 0;
    for (idx, line) in listing.lines().enumerate() {
        let line = line?;
        writeln!(out, "; {line}")?;

        let field: String = line
            .chars()
            .skip(DATA_START)
            .take(DATA_END - DATA_START)
            .filter(|c| *c != '\'')
            .collect();
        let mut tokens = field.split_whitespace();
        let Some(first) = tokens.next() else {
            continue;
        };
        let mut address = u32::from_str_radix(first, 8).map_err(|_| ListingError::BadAddress {
            line: idx + 1,
            token: first.to_string(),
        })?;
        for word in tokens {
            if address > MAX_ADDRESS {
                return Err(ListingError::AddressOutOfRange {
                    line: idx + 1,
                    address,
                });
            }
            writeln!(out, "D {address:o} {word}")?;
            address += 2;
            deposited += 1;
        }
    }
    out.write_all(POSTAMBLE.as_bytes())?;
    out.flush()?;
    Ok(deposited)
}
