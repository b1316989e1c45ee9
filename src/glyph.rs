//! Turns text into punch rows by laying each 8x8 glyph on its side.

use tracing::debug;

use crate::font::{Glyph, GlyphFont};
use crate::tape::PunchRow;

/// Rows punched for one rendered character.
pub const ROWS_PER_CHAR: usize = 8;

/// Rotate a glyph so it reads along the direction of tape travel.
///
/// Output row `c` collects pixel column `c` of every glyph row: bit `i` of the
/// result is the pixel at (row `i`, column `c`).
pub fn transpose_glyph(glyph: &Glyph) -> [PunchRow; ROWS_PER_CHAR] {
    let mut rows = [PunchRow(0); ROWS_PER_CHAR];
    for (column, out) in rows.iter_mut().enumerate() {
        let mask = 1u8 << column;
        let mut byte = 0u8;
        for (bit, pixels) in glyph.iter().enumerate() {
            if pixels & mask != 0 {
                byte |= 1 << bit;
            }
        }
        *out = PunchRow(byte);
    }
    rows
}

/// Punch rows for `text`, eight per character.
///
/// Characters the font does not cover, and blank glyphs other than the space,
/// produce no rows at all.
pub fn transpose_text<F: GlyphFont + ?Sized>(font: &F, text: &str) -> Vec<PunchRow> {
    let mut rows = Vec::with_capacity(text.len() * ROWS_PER_CHAR);
    for ch in text.chars() {
        match font.glyph(ch) {
            Some(glyph) if ch == ' ' || glyph.iter().any(|row| *row != 0) => {
                rows.extend_from_slice(&transpose_glyph(&glyph));
            }
            _ => debug!(character = ?ch, font = font.name(), "no glyph, skipping"),
        }
    }
    rows
}
