//! The logical tape: every row to punch, in order, before any layout happens.

use std::fmt;
use std::iter;

use serde::Serialize;

use crate::config::{Configuration, tape_length};
use crate::font::GlyphFont;
use crate::glyph::transpose_text;

/// One transverse row of holes. Bit 0 is the track nearest the right tape edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PunchRow(pub u8);

impl PunchRow {
    pub const BLANK: PunchRow = PunchRow(0);

    pub fn is_punched(self, bit: u8) -> bool {
        (self.0 >> bit) & 1 == 1
    }
}

impl fmt::Display for PunchRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x} - {:#010b}", self.0, self.0)
    }
}

/// Which part of the tape a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Segment {
    LeadIn,
    Title,
    Data,
    LeadOut,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::LeadIn => write!(f, "lead-in"),
            Segment::Title => write!(f, "title"),
            Segment::Data => write!(f, "data"),
            Segment::LeadOut => write!(f, "lead-out"),
        }
    }
}

/// Lead-in, title rows, data rows and lead-out, ready to be laid out.
#[derive(Debug, Clone)]
pub struct LogicalTape<'a> {
    lead_in: usize,
    title: Vec<PunchRow>,
    data: &'a [u8],
    lead_out: usize,
}

impl<'a> LogicalTape<'a> {
    pub fn new(lead_in: usize, title: Vec<PunchRow>, data: &'a [u8], lead_out: usize) -> Self {
        Self {
            lead_in,
            title,
            data,
            lead_out,
        }
    }

    /// Assemble the tape described by `config`, punching its title with `font`.
    pub fn from_config<F: GlyphFont + ?Sized>(
        config: &Configuration,
        font: &F,
        data: &'a [u8],
    ) -> Self {
        let title = if config.title.is_empty() {
            Vec::new()
        } else {
            transpose_text(font, &config.title)
        };
        Self::new(config.lead_in, title, data, config.lead_out)
    }

    pub fn len(&self) -> usize {
        self.lead_in + self.title.len() + self.data.len() + self.lead_out
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn title_rows(&self) -> usize {
        self.title.len()
    }

    /// Physical length in inches.
    pub fn length_inches(&self) -> f64 {
        tape_length(self.len())
    }

    /// A fresh pass over every row, tagged with its segment.
    pub fn rows(&self) -> impl Iterator<Item = (Segment, PunchRow)> + '_ {
        let lead_in = iter::repeat_n((Segment::LeadIn, PunchRow::BLANK), self.lead_in);
        let title = self.title.iter().map(|row| (Segment::Title, *row));
        let data = self.data.iter().map(|byte| (Segment::Data, PunchRow(*byte)));
        let lead_out = iter::repeat_n((Segment::LeadOut, PunchRow::BLANK), self.lead_out);
        lead_in.chain(title).chain(data).chain(lead_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TapeOptions;
    use crate::font::Font8x8Basic;
    use pretty_assertions::assert_eq;

    #[test]
    fn rows_come_out_in_segment_order() {
        let data = [0xAA, 0x55];
        let tape = LogicalTape::new(2, vec![PunchRow(7)], &data, 1);
        let rows: Vec<_> = tape.rows().collect();
        assert_eq!(
            rows,
            vec![
                (Segment::LeadIn, PunchRow(0)),
                (Segment::LeadIn, PunchRow(0)),
                (Segment::Title, PunchRow(7)),
                (Segment::Data, PunchRow(0xAA)),
                (Segment::Data, PunchRow(0x55)),
                (Segment::LeadOut, PunchRow(0)),
            ]
        );
        assert_eq!(tape.len(), 6);
        assert!((tape.length_inches() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn title_counts_eight_rows_per_renderable_char() {
        let config = Configuration::resolve(&TapeOptions {
            lead_in: 3,
            lead_out: 4,
            title: "HI é".into(),
            ..TapeOptions::default()
        })
        .unwrap();
        let data = vec![1u8; 17];
        let tape = LogicalTape::from_config(&config, &Font8x8Basic, &data);
        assert_eq!(tape.title_rows(), 24);
        assert_eq!(tape.len(), 3 + 24 + 17 + 4);
        assert_eq!(tape.rows().count(), tape.len());
    }

    #[test]
    fn row_bits_and_display() {
        let row = PunchRow(0b1000_0001);
        assert!(row.is_punched(0));
        assert!(!row.is_punched(1));
        assert!(row.is_punched(7));
        assert_eq!(row.to_string(), "0x81 - 0b10000001");
    }
}
