//! Vector primitives for one page: rows of holes, tape sections, cut marks
//! and DEC-style feed arrows. Positions come in from the layout cursor; nothing
//! here keeps state between calls.

use std::io::{self, Write};

use crate::config::{Configuration, ROW_PITCH};
use crate::svg::{Num, SvgWriter};
use crate::tape::PunchRow;

pub const DATA_HOLE_RADIUS: f64 = 0.036;
pub const FEED_HOLE_RADIUS: f64 = 0.023;
/// Data bit after which the feed hole sits.
pub const FEED_HOLE_AFTER_BIT: u8 = 2;

const CUT_MARK_LENGTH: f64 = 0.25;
const CUT_MARK_GAP: f64 = 0.0625;

/// Tape length between two feed arrows, in rows (10 inches).
pub const ARROW_INTERVAL_ROWS: usize = 100;
/// Rows an arrow and its label extend below their anchor row.
pub const ARROW_EXTENT_ROWS: usize = 9;
const ARROW_HALF_WIDTH: f64 = 0.15;
const ARROW_DEPTH: f64 = 0.25;
const LABEL_SIZE: f64 = 0.08;
const MARKER_COLOR: &str = "#555";

/// Horizontal centre of every hole in a row, feed hole included, right to left.
pub fn hole_positions(config: &Configuration, x: f64) -> Vec<(Hole, f64)> {
    let mut holes = Vec::with_capacity(config.bit_count as usize + 1);
    let mut cx = x + config.tape_width - ROW_PITCH;
    for bit in 0..config.bit_count {
        holes.push((Hole::Data(bit), cx));
        cx -= ROW_PITCH;
        if bit == FEED_HOLE_AFTER_BIT {
            holes.push((Hole::Feed, cx));
            cx -= ROW_PITCH;
        }
    }
    holes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hole {
    Data(u8),
    Feed,
}

/// One row of holes centred on `cy`.
pub fn row<W: Write>(
    svg: &mut SvgWriter<W>,
    config: &Configuration,
    x: f64,
    cy: f64,
    punch: PunchRow,
) -> io::Result<()> {
    svg.comment(&punch.to_string())?;
    for (hole, cx) in hole_positions(config, x) {
        let (radius, fill) = match hole {
            Hole::Feed => (FEED_HOLE_RADIUS, config.hole_color.as_str()),
            Hole::Data(bit) if punch.is_punched(bit) => (DATA_HOLE_RADIUS, config.hole_color.as_str()),
            Hole::Data(_) if config.only_render_holes => continue,
            Hole::Data(_) => (DATA_HOLE_RADIUS, config.tape_color.as_str()),
        };
        svg.empty(
            "circle",
            &[
                ("cx", &Num(cx)),
                ("cy", &Num(cy)),
                ("r", &Num(radius)),
                ("fill", &fill),
            ],
        )?;
    }
    Ok(())
}

/// Define the clip region for a column, open its group and paint the tape.
/// The caller closes the group when the column is done.
pub fn open_section<W: Write>(
    svg: &mut SvgWriter<W>,
    config: &Configuration,
    clip_id: &str,
    x: f64,
    top: f64,
    height: f64,
) -> io::Result<()> {
    svg.open("clipPath", &[("id", &clip_id)])?;
    svg.empty(
        "rect",
        &[
            ("x", &Num(x)),
            ("y", &Num(top)),
            ("width", &Num(config.tape_width)),
            ("height", &Num(height)),
        ],
    )?;
    svg.close()?;
    svg.open("g", &[("clip-path", &format!("url(#{clip_id})"))])?;
    svg.comment("Tape background")?;
    svg.empty(
        "rect",
        &[
            ("x", &Num(x)),
            ("y", &Num(top)),
            ("width", &Num(config.tape_width)),
            ("height", &Num(height)),
            ("stroke", &"none"),
            ("fill", &config.tape_color),
        ],
    )
}

/// Short dashed reference lines just outside each margin edge.
pub fn cut_marks<W: Write>(
    svg: &mut SvgWriter<W>,
    config: &Configuration,
    page_height: f64,
) -> io::Result<()> {
    let m = config.margins;
    let left = m.left;
    let right = config.page_width - m.right;
    let top = m.top;
    let bottom = page_height - m.bottom;

    svg.comment("Cut marks")?;
    // Horizontal pairs on the top and bottom edges, vertical pairs on the sides.
    for y in [top, bottom] {
        if let Some(len) = mark_length(m.left) {
            dashed(svg, (left - CUT_MARK_GAP - len, y), (left - CUT_MARK_GAP, y))?;
        }
        if let Some(len) = mark_length(m.right) {
            dashed(svg, (right + CUT_MARK_GAP, y), (right + CUT_MARK_GAP + len, y))?;
        }
    }
    for x in [left, right] {
        if let Some(len) = mark_length(m.top) {
            dashed(svg, (x, top - CUT_MARK_GAP - len), (x, top - CUT_MARK_GAP))?;
        }
        if let Some(len) = mark_length(m.bottom) {
            dashed(svg, (x, bottom + CUT_MARK_GAP), (x, bottom + CUT_MARK_GAP + len))?;
        }
    }
    Ok(())
}

fn mark_length(margin: f64) -> Option<f64> {
    let room = margin - CUT_MARK_GAP;
    (room > 0.0).then(|| room.min(CUT_MARK_LENGTH))
}

fn dashed<W: Write>(svg: &mut SvgWriter<W>, from: (f64, f64), to: (f64, f64)) -> io::Result<()> {
    svg.empty(
        "line",
        &[
            ("x1", &Num(from.0)),
            ("y1", &Num(from.1)),
            ("x2", &Num(to.0)),
            ("y2", &Num(to.1)),
            ("stroke", &"black"),
            ("stroke-width", &Num(0.01)),
            ("stroke-dasharray", &"0.03 0.02"),
        ],
    )
}

/// Tape rows (from the very start of the tape) that carry a feed arrow and
/// are at least partly visible in a column showing rows `start..start + rows`.
pub fn arrow_rows(start: usize, rows: usize) -> impl Iterator<Item = usize> {
    let first = (start.saturating_sub(ARROW_EXTENT_ROWS) / ARROW_INTERVAL_ROWS).max(1);
    let end = start + rows;
    (first..)
        .map(|k| k * ARROW_INTERVAL_ROWS)
        .skip_while(move |&anchor| anchor + ARROW_EXTENT_ROWS <= start)
        .take_while(move |&anchor| anchor < end)
}

/// A downward arrow across the tape at `y` with a two-line label.
pub fn feed_arrow<W: Write>(
    svg: &mut SvgWriter<W>,
    config: &Configuration,
    x: f64,
    y: f64,
    anchor_row: usize,
) -> io::Result<()> {
    let cx = x + config.tape_width / 2.0;
    let tip = (cx, y + ARROW_DEPTH);
    let corners = [(cx - ARROW_HALF_WIDTH, y), (cx + ARROW_HALF_WIDTH, y)];
    let inches = anchor_row / 10;

    svg.comment(&format!("Feed arrow at {inches}in"))?;
    for (from, to) in [(corners[0], corners[1]), (corners[1], tip), (tip, corners[0])] {
        svg.empty(
            "line",
            &[
                ("x1", &Num(from.0)),
                ("y1", &Num(from.1)),
                ("x2", &Num(to.0)),
                ("y2", &Num(to.1)),
                ("stroke", &MARKER_COLOR),
                ("stroke-width", &Num(0.015)),
            ],
        )?;
    }

    let label_y = y + ARROW_DEPTH + 0.1;
    let lines = [format!("{inches} IN"), format!("ROW {anchor_row}")];
    for (i, line) in lines.iter().enumerate() {
        let lx = cx + (i as f64 - 0.5) * LABEL_SIZE * 1.25;
        svg.text(
            "text",
            &[
                ("x", &Num(lx)),
                ("y", &Num(label_y)),
                ("font-family", &"monospace"),
                ("font-size", &Num(LABEL_SIZE)),
                ("fill", &MARKER_COLOR),
                (
                    "transform",
                    &format!("rotate(90 {} {})", Num(lx), Num(label_y)),
                ),
            ],
            line,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TapeOptions;
    use pretty_assertions::assert_eq;

    fn config(options: TapeOptions) -> Configuration {
        Configuration::resolve(&options).unwrap()
    }

    fn render(f: impl FnOnce(&mut SvgWriter<Vec<u8>>)) -> String {
        let mut svg = SvgWriter::new(Vec::new());
        f(&mut svg);
        String::from_utf8(svg.into_inner()).unwrap()
    }

    #[test]
    fn feed_hole_follows_bit_two() {
        let cfg = config(TapeOptions::default());
        let holes = hole_positions(&cfg, 0.0);
        assert_eq!(holes.len(), 9);
        assert_eq!(holes[0].0, Hole::Data(0));
        assert!((holes[0].1 - 0.9).abs() < 1e-9);
        assert_eq!(holes[3].0, Hole::Feed);
        assert!((holes[3].1 - 0.6).abs() < 1e-9);
        assert_eq!(holes[8].0, Hole::Data(7));
        assert!((holes[8].1 - 0.1).abs() < 1e-9);
    }

    #[test]
    fn five_track_tape_has_six_positions() {
        let cfg = config(TapeOptions {
            bit_count: 5,
            ..TapeOptions::default()
        });
        let holes = hole_positions(&cfg, 0.0);
        assert_eq!(holes.len(), 6);
        assert!(holes.iter().all(|(_, cx)| *cx > 0.0 && *cx < cfg.tape_width));
    }

    #[test]
    fn closed_holes_are_drawn_unless_only_holes() {
        let cfg = config(TapeOptions::default());
        let out = render(|svg| row(svg, &cfg, 0.0, 0.05, PunchRow(0b1)).unwrap());
        assert_eq!(out.matches("<circle").count(), 9);
        assert_eq!(out.matches("fill=\"white\"").count(), 2);

        let cfg = config(TapeOptions {
            only_render_holes: true,
            ..TapeOptions::default()
        });
        let out = render(|svg| row(svg, &cfg, 0.0, 0.05, PunchRow(0b1)).unwrap());
        assert_eq!(out.matches("<circle").count(), 2);
        assert!(out.contains("r=\"0.023\""));
    }

    #[test]
    fn cut_marks_skip_zero_margins() {
        let cfg = config(TapeOptions {
            page_size: "Letter".into(),
            ..TapeOptions::default()
        });
        let out = render(|svg| cut_marks(svg, &cfg, cfg.page_height).unwrap());
        assert_eq!(out.matches("<line").count(), 8);

        let tape = config(TapeOptions::default());
        let out = render(|svg| cut_marks(svg, &tape, 3.0).unwrap());
        assert_eq!(out.matches("<line").count(), 0);
    }

    #[test]
    fn arrows_align_to_the_whole_tape() {
        assert_eq!(arrow_rows(0, 100).collect::<Vec<_>>(), Vec::<usize>::new());
        assert_eq!(arrow_rows(0, 101).collect::<Vec<_>>(), vec![100]);
        assert_eq!(arrow_rows(95, 200).collect::<Vec<_>>(), vec![100, 200]);
        // arrow at 100 still spills into a column starting at 105
        assert_eq!(arrow_rows(105, 50).collect::<Vec<_>>(), vec![100]);
        assert_eq!(arrow_rows(110, 50).collect::<Vec<_>>(), Vec::<usize>::new());
        assert_eq!(arrow_rows(1000, 100).collect::<Vec<_>>(), vec![1000]);
    }

    #[test]
    fn section_opens_clipped_group() {
        let cfg = config(TapeOptions::default());
        let mut svg = SvgWriter::new(Vec::new());
        open_section(&mut svg, &cfg, "col0", 0.0, 0.0, 1.5).unwrap();
        assert_eq!(svg.depth(), 1);
        let out = String::from_utf8(svg.into_inner()).unwrap();
        assert!(out.contains("<clipPath id=\"col0\">"));
        assert!(out.contains("clip-path=\"url(#col0)\""));
        assert!(out.contains("fill=\"#ccc\""));
    }
}
