use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::page::Side;

/// Problems found while resolving [`TapeOptions`](crate::TapeOptions) into a
/// [`Configuration`](crate::Configuration). Always raised before any page is opened.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported page size '{0}' (expected A4, Letter, Legal or Tape)")]
    UnsupportedPageSize(String),
    #[error("unsupported bit count {0} (expected 5, 7 or 8)")]
    UnsupportedBitCount(u8),
    #[error("{name} must be a finite, non-negative number of inches (got {value})")]
    InvalidLength { name: &'static str, value: f64 },
    #[error("page leaves no room for a row: usable height {0:.3}in")]
    NoRowSpace(f64),
    #[error("tape width {tape:.3}in does not fit between the side margins ({available:.3}in)")]
    NoColumnSpace { tape: f64, available: f64 },
}

/// Failures of a rendering pass.
#[derive(Debug, Error)]
pub enum TapeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no {side:?} page is open to receive rows")]
    NoOpenPage { side: Side },
}

impl TapeError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TapeError::Write {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = TapeError> = std::result::Result<T, E>;
