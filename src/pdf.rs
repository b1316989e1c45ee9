//! Assembles rendered page SVGs into a single PDF at 1:1 physical scale.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use printpdf::{Mm, PdfDocument, PdfLayerReference, Svg, SvgTransform};
use thiserror::Error;
use tracing::debug;

/// Page SVGs are sized in inches; the converter measures them at CSS pixel density.
const SVG_DPI: f32 = 96.0;
const MM_PER_INCH: f64 = 25.4;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("no pages to assemble")]
    NoPages,
    #[error("failed to read page {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("page {} could not be converted: {message}", path.display())]
    Convert { path: PathBuf, message: String },
    #[error("failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

/// One PDF page per SVG page, in order, each `width` x `height` inches.
pub fn assemble_pdf(pages: &[PathBuf], width: f64, height: f64, output: &Path) -> Result<(), PdfError> {
    let (first, rest) = pages.split_first().ok_or(PdfError::NoPages)?;
    let page_width = Mm((width * MM_PER_INCH) as f32);
    let page_height = Mm((height * MM_PER_INCH) as f32);

    let (doc, page, layer) = PdfDocument::new("papertape", page_width, page_height, "Page 1");
    place_page(&doc.get_page(page).get_layer(layer), first)?;
    for (idx, path) in rest.iter().enumerate() {
        let (page, layer) = doc.add_page(page_width, page_height, format!("Page {}", idx + 2));
        place_page(&doc.get_page(page).get_layer(layer), path)?;
    }

    let file = File::create(output).map_err(|err| PdfError::Write {
        path: output.to_path_buf(),
        message: err.to_string(),
    })?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|err| PdfError::Write {
            path: output.to_path_buf(),
            message: format!("{err:?}"),
        })
}

fn place_page(layer: &PdfLayerReference, path: &Path) -> Result<(), PdfError> {
    let raw = fs::read_to_string(path).map_err(|source| PdfError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let svg = Svg::parse(&raw).map_err(|err| PdfError::Convert {
        path: path.to_path_buf(),
        message: format!("{err:?}"),
    })?;
    svg.into_xobject(layer).add_to_layer(
        layer,
        SvgTransform {
            dpi: Some(SVG_DPI),
            ..Default::default()
        },
    );
    debug!(page = %path.display(), "page added to pdf");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = assemble_pdf(&[], 8.5, 11.0, &dir.path().join("out.pdf")).unwrap_err();
        assert!(matches!(err, PdfError::NoPages));
    }

    #[test]
    fn missing_page_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.svg");
        let err = assemble_pdf(&[missing.clone()], 8.5, 11.0, &dir.path().join("out.pdf"))
            .unwrap_err();
        assert!(matches!(err, PdfError::Read { ref path, .. } if *path == missing));
    }
}
