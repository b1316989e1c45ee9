//! Core library for rendering binary data as printable punched paper tape.

mod config;
mod draw;
mod error;
mod font;
mod glyph;
mod layout;
mod manifest;
mod page;
mod preview;
mod simh;
mod svg;
mod tape;

#[cfg(feature = "pdf")]
mod pdf;

pub use config::{Configuration, Margins, PageSize, ROW_PITCH, TapeOptions, tape_length};
pub use error::{ConfigError, TapeError};
pub use font::{Font8x8Basic, Glyph, GlyphFont};
pub use glyph::{ROWS_PER_CHAR, transpose_glyph, transpose_text};
pub use layout::{Break, LayoutCursor, LayoutState, SideReport, render_side};
pub use manifest::{Manifest, sha256_hex};
pub use page::{Page, PageSequencer, PageSvg, Side, page_file_name};
pub use preview::{DEFAULT_PREVIEW_ROWS, PreviewError, PreviewOptions, parse_color, render_preview, save_preview};
pub use simh::{ListingError, convert_listing};
pub use svg::{Num, SvgWriter};
pub use tape::{LogicalTape, PunchRow, Segment};

#[cfg(feature = "pdf")]
pub use pdf::{PdfError, assemble_pdf};

use std::fs;
use std::path::Path;

/// Totals for a finished run, one [`SideReport`] per rendered side.
#[derive(Debug, Clone)]
pub struct RenderReport {
    pub total_rows: usize,
    pub title_rows: usize,
    pub data_bytes: usize,
    pub sides: Vec<SideReport>,
}

/// Render `data` as tape pages next to `output`: the front side always, the
/// mirrored back side when the configuration asks for it.
pub fn render_tape(
    config: &Configuration,
    data: &[u8],
    output: &Path,
) -> error::Result<RenderReport> {
    let tape = LogicalTape::from_config(config, &Font8x8Basic, data);
    let mut sides = vec![render_side(config, &tape, output, Side::Front)?];
    if config.reverse {
        sides.push(render_side(config, &tape, output, Side::Back)?);
    }
    Ok(RenderReport {
        total_rows: tape.len(),
        title_rows: tape.title_rows(),
        data_bytes: data.len(),
        sides,
    })
}

/// Read the raw bytes to punch. No input means an empty payload.
pub fn read_input(path: Option<&Path>) -> error::Result<Vec<u8>> {
    match path {
        None => Ok(Vec::new()),
        Some(path) => fs::read(path).map_err(|source| TapeError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Punch rows for `text` with the built-in font, as an ASCII picture: one
/// line per row, most significant track on the left, `.` for the feed hole.
pub fn ascii_tape(text: &str, bit_count: u8, mark: char, blank: char) -> String {
    let mut out = String::new();
    for row in transpose_text(&Font8x8Basic, text) {
        out.push('|');
        for bit in (0..bit_count).rev() {
            out.push(if row.is_punched(bit) { mark } else { blank });
            if bit == draw::FEED_HOLE_AFTER_BIT {
                out.push('.');
            }
        }
        out.push_str("|\n");
    }
    out
}
