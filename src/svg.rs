//! Minimal streaming SVG writer with explicit element nesting.

use std::fmt::{self, Display};
use std::io::{self, Write};

const INDENT: &str = "    ";

/// A length in inches, printed with at most four decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Num(pub f64);

impl Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.0.abs() < 5e-5 { 0.0 } else { self.0 };
        let text = format!("{value:.4}");
        let text = text.trim_end_matches('0').trim_end_matches('.');
        f.write_str(text)
    }
}

pub type Attrs<'a> = &'a [(&'a str, &'a dyn Display)];

/// Streams elements to `W`, indenting by the number of open elements.
pub struct SvgWriter<W: Write> {
    out: W,
    open: Vec<&'static str>,
}

impl<W: Write> SvgWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            open: Vec::new(),
        }
    }

    /// Number of currently open elements.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn declaration(&mut self) -> io::Result<()> {
        writeln!(self.out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)
    }

    pub fn open(&mut self, tag: &'static str, attrs: Attrs<'_>) -> io::Result<()> {
        self.indent()?;
        write!(self.out, "<{tag}")?;
        self.attrs(attrs)?;
        writeln!(self.out, ">")?;
        self.open.push(tag);
        Ok(())
    }

    /// Close the innermost open element. Closing with nothing open is a no-op.
    pub fn close(&mut self) -> io::Result<()> {
        let Some(tag) = self.open.pop() else {
            return Ok(());
        };
        self.indent()?;
        writeln!(self.out, "</{tag}>")
    }

    pub fn close_all(&mut self) -> io::Result<()> {
        while !self.open.is_empty() {
            self.close()?;
        }
        Ok(())
    }

    pub fn empty(&mut self, tag: &str, attrs: Attrs<'_>) -> io::Result<()> {
        self.indent()?;
        write!(self.out, "<{tag}")?;
        self.attrs(attrs)?;
        writeln!(self.out, "/>")
    }

    pub fn text(&mut self, tag: &str, attrs: Attrs<'_>, content: &str) -> io::Result<()> {
        self.indent()?;
        write!(self.out, "<{tag}")?;
        self.attrs(attrs)?;
        writeln!(self.out, ">{}</{tag}>", escape(content))
    }

    pub fn comment(&mut self, content: &str) -> io::Result<()> {
        self.indent()?;
        writeln!(self.out, "<!-- {} -->", content.replace("--", "- -"))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn indent(&mut self) -> io::Result<()> {
        for _ in 0..self.open.len() {
            self.out.write_all(INDENT.as_bytes())?;
        }
        Ok(())
    }

    fn attrs(&mut self, attrs: Attrs<'_>) -> io::Result<()> {
        for (name, value) in attrs {
            write!(self.out, r#" {name}="{}""#, escape(&value.to_string()))?;
        }
        Ok(())
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_elements_are_indented() {
        let mut svg = SvgWriter::new(Vec::new());
        svg.open("svg", &[("width", &"1in")]).unwrap();
        svg.open("g", &[]).unwrap();
        assert_eq!(svg.depth(), 2);
        svg.empty("circle", &[("cx", &Num(0.25)), ("r", &Num(0.036))])
            .unwrap();
        svg.close_all().unwrap();
        assert_eq!(svg.depth(), 0);
        let text = String::from_utf8(svg.into_inner()).unwrap();
        assert_eq!(
            text,
            "<svg width=\"1in\">\n    <g>\n        <circle cx=\"0.25\" r=\"0.036\"/>\n    </g>\n</svg>\n"
        );
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(Num(1.0).to_string(), "1");
        assert_eq!(Num(0.30000000000000004).to_string(), "0.3");
        assert_eq!(Num(-0.00001).to_string(), "0");
        assert_eq!(Num(8.267716535).to_string(), "8.2677");
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let mut svg = SvgWriter::new(Vec::new());
        svg.text("title", &[("fill", &"a\"b")], "R&D <tape>").unwrap();
        svg.comment("x -- y").unwrap();
        let text = String::from_utf8(svg.into_inner()).unwrap();
        assert_eq!(
            text,
            "<title fill=\"a&quot;b\">R&amp;D &lt;tape&gt;</title>\n<!-- x - - y -->\n"
        );
    }
}
