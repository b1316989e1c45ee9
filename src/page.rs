//! Page files: naming, scoped opening/closing, and the back-side mirror.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, TapeError};
use crate::svg::{Num, SvgWriter};

/// Which face of the printed sheet a pass renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

impl Side {
    pub fn is_mirrored(self) -> bool {
        self == Side::Back
    }
}

/// `<stem>[.<index>][.reverse]<.ext>` next to `base`.
pub fn page_file_name(base: &Path, index: usize, side: Side) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tape".to_string());
    let mut name = stem;
    if index > 0 {
        name.push_str(&format!(".{index}"));
    }
    if side.is_mirrored() {
        name.push_str(".reverse");
    }
    if let Some(ext) = base.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    base.with_file_name(name)
}

pub type PageSvg = SvgWriter<BufWriter<File>>;

/// One open page document. The header is written on creation; [`Page::finish`]
/// closes every open element and flushes. A page dropped without `finish`
/// still flushes what was written so far.
pub struct Page {
    path: PathBuf,
    svg: PageSvg,
}

impl Page {
    pub fn create(path: PathBuf, side: Side, width: f64, height: f64, index: usize) -> Result<Self> {
        let file = File::create(&path).map_err(|err| TapeError::write(&path, err))?;
        let mut page = Self {
            svg: SvgWriter::new(BufWriter::new(file)),
            path,
        };
        page.header(side, width, height, index)
            .map_err(|err| TapeError::write(&page.path, err))?;
        debug!(path = %page.path.display(), ?side, index, "page opened");
        Ok(page)
    }

    fn header(&mut self, side: Side, width: f64, height: f64, index: usize) -> std::io::Result<()> {
        let svg = &mut self.svg;
        svg.declaration()?;
        svg.open(
            "svg",
            &[
                ("xmlns", &"http://www.w3.org/2000/svg"),
                ("version", &"1.1"),
                ("baseProfile", &"full"),
                ("width", &format!("{}in", Num(width))),
                ("height", &format!("{}in", Num(height))),
                ("viewBox", &format!("0 0 {} {}", Num(width), Num(height))),
            ],
        )?;
        svg.text("title", &[], "papertape")?;
        let side_label = match side {
            Side::Front => "front",
            Side::Back => "reverse",
        };
        svg.text(
            "desc",
            &[],
            &format!("Paper tape generated from binary data, page {} ({side_label})", index + 1),
        )?;
        if side.is_mirrored() {
            svg.open(
                "g",
                &[(
                    "transform",
                    &format!("translate(0 {}) scale(1 -1)", Num(height)),
                )],
            )?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn svg(&mut self) -> &mut PageSvg {
        &mut self.svg
    }

    /// Write a page-level I/O failure with this page's path attached.
    pub fn io_error(&self, err: std::io::Error) -> TapeError {
        TapeError::write(&self.path, err)
    }

    pub fn finish(mut self) -> Result<PathBuf> {
        let closed = self.svg.close_all().and_then(|_| self.svg.flush());
        closed.map_err(|err| TapeError::write(&self.path, err))?;
        debug!(path = %self.path.display(), "page closed");
        Ok(self.path)
    }
}

/// Opens pages one after another for a single side and remembers their names.
pub struct PageSequencer {
    base: PathBuf,
    side: Side,
    width: f64,
    height: f64,
    pages: Vec<PathBuf>,
    current: Option<Page>,
}

impl PageSequencer {
    pub fn new(base: &Path, side: Side, width: f64, height: f64) -> Self {
        Self {
            base: base.to_path_buf(),
            side,
            width,
            height,
            pages: Vec::new(),
            current: None,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Close the current page (if any) and open the next one.
    pub fn next_page(&mut self) -> Result<&mut Page> {
        self.close_current()?;
        let index = self.pages.len();
        let path = page_file_name(&self.base, index, self.side);
        let page = Page::create(path, self.side, self.width, self.height, index)?;
        Ok(self.current.insert(page))
    }

    /// The page rows are currently written to.
    pub fn open_page(&mut self) -> Result<&mut Page> {
        let side = self.side;
        self.current.as_mut().ok_or(TapeError::NoOpenPage { side })
    }

    /// Close the last page and return every page written, in order.
    pub fn finish(mut self) -> Result<Vec<PathBuf>> {
        self.close_current()?;
        Ok(self.pages)
    }

    fn close_current(&mut self) -> Result<()> {
        if let Some(page) = self.current.take() {
            let path = page.finish()?;
            self.pages.push(path);
        }
        Ok(())
    }
}
