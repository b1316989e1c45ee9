//! Raster preview of the start of a tape, drawn as one horizontal strip.

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use thiserror::Error;
use tracing::warn;

use crate::config::{Configuration, ROW_PITCH};
use crate::draw::{DATA_HOLE_RADIUS, FEED_HOLE_RADIUS, Hole, hole_positions};
use crate::tape::LogicalTape;

pub const DEFAULT_PREVIEW_ROWS: usize = 400;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("unsupported color '{0}' (use #rgb, #rrggbb or a basic color name)")]
    UnknownColor(String),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Options controlling PNG generation.
#[derive(Debug, Clone, Copy)]
pub struct PreviewOptions {
    pub dpi: u32,
    /// Rows drawn from the start of the tape.
    pub rows: usize,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            dpi: 150,
            rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

/// Draw the first rows of `tape` left to right, least significant track at the bottom.
pub fn render_preview(
    config: &Configuration,
    tape: &LogicalTape<'_>,
    options: &PreviewOptions,
) -> Result<RgbaImage, PreviewError> {
    let dpi = options.dpi.clamp(24, 600);
    let dpi_f = dpi as f64;
    let tape_color = parse_color(&config.tape_color)?;
    let hole_color = parse_color(&config.hole_color)?;

    if tape.is_empty() {
        warn!("tape has no rows, preview is a blank strip");
    }
    let rows = options.rows.min(tape.len()).max(1);
    let width = inches_to_px(rows as f64 * ROW_PITCH, dpi);
    let height = inches_to_px(config.tape_width, dpi);
    let mut strip = ImageBuffer::from_pixel(width, height, tape_color);

    let data_radius = ((DATA_HOLE_RADIUS * dpi_f).round() as i32).max(1);
    let feed_radius = ((FEED_HOLE_RADIUS * dpi_f).round() as i32).max(1);
    // Across the strip the hole order is the same as on the page, read bottom-up.
    let holes = hole_positions(config, 0.0);

    for (index, (_, row)) in tape.rows().take(rows).enumerate() {
        let center_x = ((index as f64 + 0.5) * ROW_PITCH * dpi_f).round() as i32;
        for (hole, across) in &holes {
            let center_y = (*across * dpi_f).round() as i32;
            let radius = match hole {
                Hole::Feed => feed_radius,
                Hole::Data(bit) if row.is_punched(*bit) => data_radius,
                Hole::Data(_) => continue,
            };
            draw_filled_circle_mut(&mut strip, (center_x, center_y), radius, hole_color);
        }
    }
    Ok(strip)
}

pub fn save_preview(
    config: &Configuration,
    tape: &LogicalTape<'_>,
    options: &PreviewOptions,
    path: &Path,
) -> Result<(), PreviewError> {
    let strip = render_preview(config, tape, options)?;
    strip.save(path)?;
    Ok(())
}

fn inches_to_px(inches: f64, dpi: u32) -> u32 {
    ((inches * dpi as f64).round() as u32).max(1)
}

/// Parse the CSS colors the SVG output accepts into pixels.
pub fn parse_color(raw: &str) -> Result<Rgba<u8>, PreviewError> {
    let value = raw.trim().to_ascii_lowercase();
    let unknown = || PreviewError::UnknownColor(raw.to_string());
    if let Some(hex) = value.strip_prefix('#') {
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(unknown)?;
        return match digits.as_slice() {
            [r, g, b] => Ok(rgba(r * 17, g * 17, b * 17)),
            [r1, r0, g1, g0, b1, b0] => Ok(rgba(r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0)),
            _ => Err(unknown()),
        };
    }
    let color = match value.as_str() {
        "white" => rgba(0xff, 0xff, 0xff),
        "black" => rgba(0x00, 0x00, 0x00),
        "gray" | "grey" => rgba(0x80, 0x80, 0x80),
        "silver" => rgba(0xc0, 0xc0, 0xc0),
        "red" => rgba(0xff, 0x00, 0x00),
        "green" => rgba(0x00, 0x80, 0x00),
        "blue" => rgba(0x00, 0x00, 0xff),
        "yellow" => rgba(0xff, 0xff, 0x00),
        "ivory" => rgba(0xff, 0xff, 0xf0),
        "beige" => rgba(0xf5, 0xf5, 0xdc),
        "pink" => rgba(0xff, 0xc0, 0xcb),
        _ => return Err(unknown()),
    };
    Ok(color)
}

fn rgba(r: u8, g: u8, b: u8) -> Rgba<u8> {
    Rgba([r, g, b, 0xff])
}
