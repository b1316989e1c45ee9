//! JSON record of a rendering run: what went in, which pages came out.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::Configuration;
use crate::error::{Result, TapeError};
use crate::layout::SideReport;

const MANIFEST_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub version: u8,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    pub input_sha256: String,
    pub input_bytes: usize,
    pub total_rows: usize,
    pub title_rows: usize,
    pub config: Configuration,
    pub sides: Vec<SideReport>,
}

impl Manifest {
    pub fn new(
        config: &Configuration,
        input: Option<&Path>,
        data: &[u8],
        total_rows: usize,
        title_rows: usize,
        sides: Vec<SideReport>,
    ) -> Self {
        Self {
            version: MANIFEST_VERSION,
            created_at: Utc::now(),
            input: input.map(Path::to_path_buf),
            input_sha256: sha256_hex(data),
            input_bytes: data.len(),
            total_rows,
            title_rows,
            config: config.clone(),
            sides,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|err| TapeError::write(path, err))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|err| TapeError::write(path, err.into()))?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|err| TapeError::write(path, err))
    }
}

/// Lower-case hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    format!("{digest:02x}")
}
