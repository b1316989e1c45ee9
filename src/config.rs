//! Geometry resolution: turns user-facing [`TapeOptions`] into the immutable
//! [`Configuration`] every rendering pass reads from.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Distance between consecutive rows (and between hole positions across the tape).
pub const ROW_PITCH: f64 = 0.1;

/// Absorbs floating-point noise when a length is converted to a whole number of rows.
const ROW_EPSILON: f64 = 1e-6;

const FIVE_TRACK_WIDTH: f64 = 11.0 / 16.0;
const WIDE_TRACK_WIDTH: f64 = 1.0;

/// Physical sheet the tape is laid out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// One continuous strip, as tall as the whole tape.
    Tape,
    A4,
    Letter,
    Legal,
}

impl PageSize {
    /// Parse a page-size token. An empty token selects [`PageSize::Tape`].
    pub fn parse(token: &str) -> Result<Self, ConfigError> {
        let token = token.trim();
        if token.is_empty() || token.eq_ignore_ascii_case("tape") {
            return Ok(PageSize::Tape);
        }
        if token.eq_ignore_ascii_case("a4") {
            Ok(PageSize::A4)
        } else if token.eq_ignore_ascii_case("letter") {
            Ok(PageSize::Letter)
        } else if token.eq_ignore_ascii_case("legal") {
            Ok(PageSize::Legal)
        } else {
            Err(ConfigError::UnsupportedPageSize(token.to_string()))
        }
    }

    /// Sheet width and height in inches, `None` for the unbounded tape page.
    pub fn dimensions(self) -> Option<(f64, f64)> {
        match self {
            PageSize::Tape => None,
            PageSize::A4 => Some((21.0 / 2.54, 29.7 / 2.54)),
            PageSize::Letter => Some((8.5, 11.0)),
            PageSize::Legal => Some((8.5, 14.0)),
        }
    }
}

impl FromStr for PageSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageSize::parse(s)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::Tape => write!(f, "Tape"),
            PageSize::A4 => write!(f, "A4"),
            PageSize::Letter => write!(f, "Letter"),
            PageSize::Legal => write!(f, "Legal"),
        }
    }
}

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub const ZERO: Margins = Margins::uniform(0.0);

    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Margins::uniform(0.5)
    }
}

/// Raw, user-facing rendering options. Loaded from JSON and/or filled from the
/// command line, then resolved once with [`Configuration::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TapeOptions {
    pub bit_count: u8,
    pub lead_in: usize,
    pub lead_out: usize,
    pub title: String,
    pub tape_color: String,
    pub hole_color: String,
    /// `A4`, `Letter`, `Legal`, `Tape` or empty (same as `Tape`).
    pub page_size: String,
    pub margins: Margins,
    pub column_spacing: f64,
    /// Maximum column height in inches, 0 disables fan-fold breaks.
    pub fan_fold: f64,
    pub only_render_holes: bool,
    pub cut_marks: bool,
    pub dec_arrows: bool,
    /// Also render the mirrored back side.
    pub reverse: bool,
}

impl Default for TapeOptions {
    fn default() -> Self {
        Self {
            bit_count: 8,
            lead_in: 10,
            lead_out: 10,
            title: String::new(),
            tape_color: "#ccc".to_string(),
            hole_color: "white".to_string(),
            page_size: "Tape".to_string(),
            margins: Margins::default(),
            column_spacing: 0.25,
            fan_fold: 0.0,
            only_render_holes: false,
            cut_marks: false,
            dec_arrows: false,
            reverse: false,
        }
    }
}

impl TapeOptions {
    /// Load options from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

/// Resolved, read-only geometry and styling for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    pub bit_count: u8,
    pub tape_width: f64,
    pub page_size: PageSize,
    pub page_width: f64,
    /// 0 for [`PageSize::Tape`]: the page grows to the tape length.
    pub page_height: f64,
    /// Bottom margin already includes the fan-fold excess and the rounding remainder.
    pub margins: Margins,
    pub column_spacing: f64,
    pub fan_fold: f64,
    /// Drawable column height, an exact multiple of [`ROW_PITCH`]. 0 when unbounded.
    pub row_span: f64,
    column_rows: usize,
    pub lead_in: usize,
    pub lead_out: usize,
    pub title: String,
    pub tape_color: String,
    pub hole_color: String,
    pub only_render_holes: bool,
    pub cut_marks: bool,
    pub dec_arrows: bool,
    pub reverse: bool,
}

impl Configuration {
    pub fn resolve(options: &TapeOptions) -> Result<Self, ConfigError> {
        if !matches!(options.bit_count, 5 | 7 | 8) {
            return Err(ConfigError::UnsupportedBitCount(options.bit_count));
        }
        check_length("top margin", options.margins.top)?;
        check_length("right margin", options.margins.right)?;
        check_length("bottom margin", options.margins.bottom)?;
        check_length("left margin", options.margins.left)?;
        check_length("column spacing", options.column_spacing)?;
        check_length("fan-fold interval", options.fan_fold)?;

        let tape_width = if options.bit_count <= 5 {
            FIVE_TRACK_WIDTH
        } else {
            WIDE_TRACK_WIDTH
        };
        let page_size = PageSize::parse(&options.page_size)?;

        let mut margins = options.margins;
        let (page_width, page_height, row_span, column_rows) = match page_size.dimensions() {
            None => {
                margins = Margins::ZERO;
                (tape_width, 0.0, 0.0, 0)
            }
            Some((width, height)) => {
                let mut usable = height - margins.top - margins.bottom;
                if options.fan_fold > 0.0 && usable > options.fan_fold {
                    margins.bottom += usable - options.fan_fold;
                    usable = options.fan_fold;
                }
                let rows = whole_rows(usable);
                if rows == 0 {
                    return Err(ConfigError::NoRowSpace(usable));
                }
                let row_span = rows as f64 * ROW_PITCH;
                margins.bottom += usable - row_span;

                let available = width - margins.left - margins.right;
                if tape_width > available + ROW_EPSILON {
                    return Err(ConfigError::NoColumnSpace {
                        tape: tape_width,
                        available,
                    });
                }
                (width, height, row_span, rows)
            }
        };

        Ok(Self {
            bit_count: options.bit_count,
            tape_width,
            page_size,
            page_width,
            page_height,
            margins,
            column_spacing: options.column_spacing,
            fan_fold: options.fan_fold,
            row_span,
            column_rows,
            lead_in: options.lead_in,
            lead_out: options.lead_out,
            title: options.title.clone(),
            tape_color: options.tape_color.clone(),
            hole_color: options.hole_color.clone(),
            only_render_holes: options.only_render_holes,
            cut_marks: options.cut_marks,
            dec_arrows: options.dec_arrows,
            reverse: options.reverse,
        })
    }

    /// True when the tape is split over fixed-size sheets.
    pub fn is_paginated(&self) -> bool {
        self.page_size != PageSize::Tape
    }

    /// Rows that fit in one column for a tape of `total_rows` rows.
    pub fn rows_per_column(&self, total_rows: usize) -> usize {
        if self.is_paginated() {
            self.column_rows
        } else {
            total_rows.max(1)
        }
    }

    /// Columns that fit side by side between the left and right margins.
    pub fn columns_per_page(&self) -> usize {
        if !self.is_paginated() {
            return 1;
        }
        let pitch = self.tape_width + self.column_spacing;
        let spare = self.page_width - self.margins.left - self.margins.right - self.tape_width;
        1 + ((spare / pitch) + ROW_EPSILON).floor().max(0.0) as usize
    }

    /// Left edge of the `index`-th column on a page, counting from the right.
    pub fn column_x(&self, index: usize) -> f64 {
        self.page_width
            - self.margins.right
            - self.tape_width
            - index as f64 * (self.tape_width + self.column_spacing)
    }

    /// Height of every page for a tape of `total_rows` rows.
    pub fn page_height_for(&self, total_rows: usize) -> f64 {
        if self.is_paginated() {
            self.page_height
        } else {
            tape_length(total_rows)
        }
    }
}

/// Physical length in inches of `rows` rows of tape.
pub fn tape_length(rows: usize) -> f64 {
    rows as f64 * ROW_PITCH
}

fn whole_rows(length: f64) -> usize {
    if length <= 0.0 {
        return 0;
    }
    (length / ROW_PITCH + ROW_EPSILON).floor() as usize
}

fn check_length(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidLength { name, value })
    }
}
