//! Pagination: walks the logical tape row by row and decides where every row
//! lands: which page, which column, how far down.
//!
//! Columns fill a page right to left. A column break happens when a row
//! arrives and the current column already holds `rows_per_column` rows; a
//! page break happens when the next column would cross the left margin.
//! Breaks are taken lazily, so a tape ending exactly on a boundary never
//! leaves an empty column or page behind.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Configuration, ROW_PITCH};
use crate::draw;
use crate::error::Result;
use crate::page::{Page, PageSequencer, Side};
use crate::tape::{LogicalTape, Segment};

/// Where the cursor is in the pagination life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    NoPage,
    PageOpen,
    ColumnFull,
    Closed,
}

/// What has to happen before the next row can be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Break {
    None,
    NewColumn,
    NewPage,
}

/// Position bookkeeping for one pass. Positions are derived from integer
/// page/column/row indices so the row pitch never drifts.
#[derive(Debug, Clone)]
pub struct LayoutCursor {
    state: LayoutState,
    rows_per_column: usize,
    columns_per_page: usize,
    total_rows: usize,
    page: usize,
    column: usize,
    columns_opened: usize,
    row_in_column: usize,
    rows_punched: usize,
    column_start: usize,
    x: f64,
    y: f64,
    top: f64,
}

impl LayoutCursor {
    pub fn new(config: &Configuration, total_rows: usize) -> Self {
        Self {
            state: LayoutState::NoPage,
            rows_per_column: config.rows_per_column(total_rows),
            columns_per_page: config.columns_per_page(),
            total_rows,
            page: 0,
            column: 0,
            columns_opened: 0,
            row_in_column: 0,
            rows_punched: 0,
            column_start: 0,
            x: config.column_x(0),
            y: config.margins.top,
            top: config.margins.top,
        }
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    /// Prepare for the next row, reporting the break (if any) it requires.
    pub fn advance(&mut self, config: &Configuration) -> Break {
        match self.state {
            LayoutState::NoPage => {
                self.start_column(config, 0, 0);
                Break::NewPage
            }
            LayoutState::ColumnFull => {
                if self.column + 1 < self.columns_per_page {
                    self.start_column(config, self.page, self.column + 1);
                    Break::NewColumn
                } else {
                    self.start_column(config, self.page + 1, 0);
                    Break::NewPage
                }
            }
            LayoutState::PageOpen | LayoutState::Closed => Break::None,
        }
    }

    /// Account for the row just placed at [`LayoutCursor::row_center`].
    pub fn punch(&mut self) {
        debug_assert_eq!(self.state, LayoutState::PageOpen);
        self.row_in_column += 1;
        self.rows_punched += 1;
        self.y = self.top + self.row_in_column as f64 * ROW_PITCH;
        if self.row_in_column >= self.rows_per_column {
            self.state = LayoutState::ColumnFull;
        }
    }

    pub fn close(&mut self) {
        self.state = LayoutState::Closed;
    }

    fn start_column(&mut self, config: &Configuration, page: usize, column: usize) {
        self.page = page;
        self.column = column;
        self.columns_opened += 1;
        self.row_in_column = 0;
        self.column_start = self.rows_punched;
        self.x = config.column_x(column);
        self.y = self.top;
        self.state = LayoutState::PageOpen;
    }

    /// Left edge of the current column.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Top edge of the next row.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Vertical centre of the next row.
    pub fn row_center(&self) -> f64 {
        self.y + ROW_PITCH / 2.0
    }

    pub fn page_index(&self) -> usize {
        self.page
    }

    pub fn column_index(&self) -> usize {
        self.column
    }

    /// Columns opened so far across all pages.
    pub fn columns_opened(&self) -> usize {
        self.columns_opened
    }

    pub fn rows_punched(&self) -> usize {
        self.rows_punched
    }

    /// Identifier of the current column's clip region, unique within a pass.
    pub fn clip_id(&self) -> String {
        format!("col{}", self.columns_opened.saturating_sub(1))
    }

    /// Tape row the current column starts with.
    pub fn column_start(&self) -> usize {
        self.column_start
    }

    /// Rows left to place, counted from the start of the current column.
    pub fn remaining_rows(&self) -> usize {
        self.total_rows - self.column_start
    }

    /// Rows the current column will actually hold.
    pub fn column_rows(&self) -> usize {
        self.remaining_rows().min(self.rows_per_column)
    }
}

/// Outcome of one side's pass.
#[derive(Debug, Clone, Serialize)]
pub struct SideReport {
    pub side: Side,
    pub pages: Vec<PathBuf>,
    pub columns: usize,
    pub rows: usize,
    pub page_width: f64,
    pub page_height: f64,
}

/// Lay out the whole tape for one side, writing pages next to `base`.
pub fn render_side(
    config: &Configuration,
    tape: &LogicalTape<'_>,
    base: &Path,
    side: Side,
) -> Result<SideReport> {
    let total_rows = tape.len();
    let page_height = config.page_height_for(total_rows);
    let mut cursor = LayoutCursor::new(config, total_rows);
    let mut pages = PageSequencer::new(base, side, config.page_width, page_height);
    let mut segment: Option<Segment> = None;

    info!(?side, rows = total_rows, "rendering tape");

    for (row_segment, row) in tape.rows() {
        let page = match cursor.advance(config) {
            Break::NewPage => {
                let page = pages.next_page()?;
                begin_page(page, config, page_height)?;
                begin_column(page, config, &cursor)?;
                page
            }
            Break::NewColumn => {
                let page = pages.open_page()?;
                let closed = page.svg().close();
                closed.map_err(|err| page.io_error(err))?;
                debug!(column = cursor.column_index(), page = cursor.page_index(), "column break");
                begin_column(page, config, &cursor)?;
                page
            }
            Break::None => pages.open_page()?,
        };

        let svg = page.svg();
        let written = (|| -> std::io::Result<()> {
            if segment != Some(row_segment) {
                svg.comment(&format!("{row_segment} starts at row {}", cursor.rows_punched()))?;
                segment = Some(row_segment);
            }
            draw::row(svg, config, cursor.x(), cursor.row_center(), row)
        })();
        written.map_err(|err| page.io_error(err))?;
        cursor.punch();
    }

    // An empty tape still gets its page: margins, cut marks and an empty section.
    if cursor.state() == LayoutState::NoPage {
        cursor.advance(config);
        let page = pages.next_page()?;
        begin_page(page, config, page_height)?;
        begin_column(page, config, &cursor)?;
    }
    cursor.close();

    let written = pages.finish()?;
    info!(
        ?side,
        pages = written.len(),
        columns = cursor.columns_opened(),
        rows = cursor.rows_punched(),
        "tape rendered"
    );
    Ok(SideReport {
        side,
        pages: written,
        columns: cursor.columns_opened(),
        rows: cursor.rows_punched(),
        page_width: config.page_width,
        page_height,
    })
}

fn begin_page(page: &mut Page, config: &Configuration, page_height: f64) -> Result<()> {
    if !config.cut_marks {
        return Ok(());
    }
    let drawn = draw::cut_marks(page.svg(), config, page_height);
    drawn.map_err(|err| page.io_error(err))
}

fn begin_column(page: &mut Page, config: &Configuration, cursor: &LayoutCursor) -> Result<()> {
    let height = cursor.column_rows() as f64 * ROW_PITCH;
    let svg = page.svg();
    let drawn = (|| -> std::io::Result<()> {
        draw::open_section(svg, config, &cursor.clip_id(), cursor.x(), cursor.y(), height)?;
        if config.dec_arrows {
            let start = cursor.column_start();
            for anchor in draw::arrow_rows(start, cursor.column_rows()) {
                let offset = anchor as f64 - start as f64;
                let y = cursor.y() + offset * ROW_PITCH;
                draw::feed_arrow(svg, config, cursor.x(), y, anchor)?;
            }
        }
        Ok(())
    })();
    drawn.map_err(|err| page.io_error(err))
}
