//! Rendering command (`papertape render ...`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use papertape::{
    Configuration, DEFAULT_PREVIEW_ROWS, Font8x8Basic, LogicalTape, Manifest, PageSize,
    PreviewOptions, RenderReport, TapeOptions, read_input, render_tape, save_preview,
};
use tracing::info;

use crate::cli::common::PageSizeArg;
use crate::cli::utils::{ensure_parent, read_stdin};

/// Args for `papertape render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Binary file to punch (`-` for stdin). Without it only leader and title are rendered.
    pub input: Option<PathBuf>,
    /// First page file; further pages and reverse sides are named after it.
    #[arg(short = 'o', long = "output", default_value = "output.svg")]
    pub output: PathBuf,
    /// JSON file with rendering options. Flags given here take precedence.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Data tracks on the tape (5, 7 or 8).
    #[arg(long)]
    pub bit_count: Option<u8>,
    /// Blank rows before the title and data.
    #[arg(long)]
    pub lead_in: Option<usize>,
    /// Blank rows after the data.
    #[arg(long)]
    pub lead_out: Option<usize>,
    /// Text punched as readable glyphs ahead of the data.
    #[arg(long)]
    pub title: Option<String>,
    /// Tape background color.
    #[arg(long)]
    pub tape_color: Option<String>,
    /// Color of punched holes.
    #[arg(long)]
    pub hole_color: Option<String>,
    /// Sheet to lay the tape out on.
    #[arg(long, value_enum)]
    pub page_size: Option<PageSizeArg>,
    #[arg(long)]
    pub margin_top: Option<f64>,
    #[arg(long)]
    pub margin_right: Option<f64>,
    #[arg(long)]
    pub margin_bottom: Option<f64>,
    #[arg(long)]
    pub margin_left: Option<f64>,
    /// Gap between neighbouring columns, in inches.
    #[arg(long)]
    pub column_spacing: Option<f64>,
    /// Maximum column height in inches (0 disables).
    #[arg(long)]
    pub fan_fold: Option<f64>,

    /// Draw only punched holes and the feed track.
    #[arg(long)]
    pub only_holes: bool,
    /// Add cut marks at the margin corners.
    #[arg(long)]
    pub cut_marks: bool,
    /// Mark every 10 inches of tape with a feed arrow.
    #[arg(long)]
    pub dec_arrows: bool,
    /// Also render the mirrored back side.
    #[arg(long)]
    pub reverse: bool,

    /// Write a JSON record of the run.
    #[arg(long)]
    pub manifest: Option<PathBuf>,
    /// Write a PNG strip of the start of the tape.
    #[arg(long)]
    pub preview: Option<PathBuf>,
    /// Rows drawn in the preview strip.
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub preview_rows: usize,
    /// Resolution of the preview strip.
    #[arg(long, default_value_t = 150)]
    pub preview_dpi: u32,
    /// Collect all rendered pages into one PDF.
    #[cfg(feature = "pdf")]
    #[arg(long)]
    pub pdf: Option<PathBuf>,
}

impl RenderArgs {
    /// Options from `--config` (or defaults) with explicit flags applied on top.
    pub fn options(&self) -> Result<TapeOptions> {
        let mut options = match &self.config {
            Some(path) => TapeOptions::load(path)?,
            None => TapeOptions::default(),
        };
        if let Some(bits) = self.bit_count {
            options.bit_count = bits;
        }
        if let Some(rows) = self.lead_in {
            options.lead_in = rows;
        }
        if let Some(rows) = self.lead_out {
            options.lead_out = rows;
        }
        if let Some(title) = &self.title {
            options.title = title.clone();
        }
        if let Some(color) = &self.tape_color {
            options.tape_color = color.clone();
        }
        if let Some(color) = &self.hole_color {
            options.hole_color = color.clone();
        }
        if let Some(size) = self.page_size {
            options.page_size = PageSize::from(size).to_string();
        }
        let margins = &mut options.margins;
        for (value, target) in [
            (self.margin_top, &mut margins.top),
            (self.margin_right, &mut margins.right),
            (self.margin_bottom, &mut margins.bottom),
            (self.margin_left, &mut margins.left),
        ] {
            if let Some(value) = value {
                *target = value;
            }
        }
        if let Some(spacing) = self.column_spacing {
            options.column_spacing = spacing;
        }
        if let Some(fold) = self.fan_fold {
            options.fan_fold = fold;
        }
        options.only_render_holes |= self.only_holes;
        options.cut_marks |= self.cut_marks;
        options.dec_arrows |= self.dec_arrows;
        options.reverse |= self.reverse;
        Ok(options)
    }
}

/// Execute a render command.
pub fn handle(args: RenderArgs) -> Result<()> {
    let options = args.options()?;
    let config = Configuration::resolve(&options).context("invalid tape configuration")?;

    let data = match args.input.as_deref() {
        Some(path) if path.as_os_str() == "-" => read_stdin()?,
        input => read_input(input)?,
    };

    ensure_parent(&args.output)?;
    let report = render_tape(&config, &data, &args.output)
        .with_context(|| format!("failed to render tape to {}", args.output.display()))?;
    print_summary(&report);

    if let Some(path) = &args.manifest {
        ensure_parent(path)?;
        Manifest::new(
            &config,
            args.input.as_deref(),
            &data,
            report.total_rows,
            report.title_rows,
            report.sides.clone(),
        )
        .save(path)
        .with_context(|| format!("failed to write manifest {}", path.display()))?;
        println!("Wrote manifest to {}", path.display());
    }

    if let Some(path) = &args.preview {
        ensure_parent(path)?;
        let tape = LogicalTape::from_config(&config, &Font8x8Basic, &data);
        let preview = PreviewOptions {
            dpi: args.preview_dpi,
            rows: args.preview_rows,
        };
        save_preview(&config, &tape, &preview, path)
            .with_context(|| format!("failed to write preview {}", path.display()))?;
        println!(
            "Wrote preview of {} rows to {}",
            preview.rows.min(tape.len()),
            path.display()
        );
    }

    #[cfg(feature = "pdf")]
    if let Some(path) = &args.pdf {
        ensure_parent(path)?;
        pdf(&report, path)?;
    }

    Ok(())
}

fn print_summary(report: &RenderReport) {
    info!(
        rows = report.total_rows,
        title_rows = report.title_rows,
        data_bytes = report.data_bytes,
        "render complete"
    );
    for side in &report.sides {
        println!(
            "Rendered {} {:?} page(s), {} column(s), {} rows",
            side.pages.len(),
            side.side,
            side.columns,
            side.rows
        );
        for page in &side.pages {
            println!("  {}", page.display());
        }
    }
}

/// Front pages, each followed by its reverse when one was rendered.
#[cfg(feature = "pdf")]
fn pdf(report: &RenderReport, path: &std::path::Path) -> Result<()> {
    let Some(front) = report.sides.first() else {
        return Ok(());
    };
    let pages: Vec<PathBuf> = match report.sides.get(1) {
        Some(back) => front
            .pages
            .iter()
            .zip(&back.pages)
            .flat_map(|(f, b)| [f.clone(), b.clone()])
            .collect(),
        None => front.pages.clone(),
    };
    papertape::assemble_pdf(&pages, front.page_width, front.page_height, path)
        .with_context(|| format!("failed to assemble {}", path.display()))?;
    println!("Wrote {} page(s) to {}", pages.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn render_args(argv: &[&str]) -> RenderArgs {
        let argv = ["papertape", "render"].iter().chain(argv);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Render(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn flags_override_defaults() {
        let options = render_args(&[
            "--page-size",
            "a4",
            "--margin-left",
            "0.25",
            "--lead-in",
            "0",
            "--title",
            "HELLO",
            "--only-holes",
        ])
        .options()
        .unwrap();
        assert_eq!(options.page_size, "A4");
        assert_eq!(options.margins.left, 0.25);
        assert_eq!(options.margins.top, 0.5);
        assert_eq!(options.lead_in, 0);
        assert_eq!(options.lead_out, 10);
        assert_eq!(options.title, "HELLO");
        assert!(options.only_render_holes);
    }

    #[test]
    fn config_file_is_the_base_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tape.json");
        std::fs::write(&path, r#"{"page_size": "Legal", "lead_out": 40, "cut_marks": true}"#)
            .unwrap();
        let config = path.to_str().unwrap();
        let options = render_args(&["--config", config, "--lead-out", "5"])
            .options()
            .unwrap();
        assert_eq!(options.page_size, "Legal");
        assert_eq!(options.lead_out, 5);
        assert!(options.cut_marks);
    }

    #[test]
    fn broken_config_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tape.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = render_args(&["--config", path.to_str().unwrap()])
            .options()
            .unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }
}
