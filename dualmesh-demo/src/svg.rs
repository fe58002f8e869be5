//! SVG implementation of [`dualmesh::Canvas`], wrapping a buffered file
//! writer the way a plain `std::io::Write`-based writer would.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use dualmesh::{Canvas, Color};

pub struct SvgCanvas {
    writer: BufWriter<File>,
    /// The first write failure encountered by a `Canvas` method, if any.
    /// `Canvas`'s methods don't return `Result`, so this is surfaced later,
    /// in `finish`.
    error: io::Result<()>,
}

impl SvgCanvas {
    pub fn create(path: &Path, width: f64, height: f64) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_header(&mut writer, width, height)?;
        Ok(Self { writer, error: Ok(()) })
    }

    pub fn finish(mut self) -> Result<()> {
        self.error.context("failed to write SVG element")?;
        write_footer(&mut self.writer)?;
        self.writer.flush().context("failed to flush SVG output")?;
        Ok(())
    }

    fn record(&mut self, result: io::Result<()>) {
        if self.error.is_ok() {
            self.error = result;
        }
    }
}

fn write_header<W: Write>(writer: &mut W, width: f64, height: f64) -> Result<()> {
    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#)?;
    writeln!(
        writer,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    )?;
    writeln!(writer, r#"<rect width="100%" height="100%" fill="#0b1d3a"/>"#)?;
    Ok(())
}

fn write_footer<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "</svg>")?;
    Ok(())
}

fn rgba(color: Color) -> String {
    format!("rgba({},{},{},{:.3})", color.r, color.g, color.b, color.a as f64 / 255.0)
}

impl Canvas for SvgCanvas {
    fn draw_point(&mut self, color: Color, radius: f64, x: f64, y: f64) {
        let result = writeln!(
            self.writer,
            r#"<circle cx="{x}" cy="{y}" r="{radius}" fill="{}"/>"#,
            rgba(color)
        );
        self.record(result);
    }

    fn draw_line_segment(&mut self, color: Color, width: f64, x1: f64, y1: f64, x2: f64, y2: f64) {
        let result = writeln!(
            self.writer,
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{}" stroke-width="{width}"/>"#,
            rgba(color)
        );
        self.record(result);
    }

    fn draw_polygon(&mut self, color: Color, flat_xy_coords: &[f64]) {
        let points: String = flat_xy_coords
            .chunks_exact(2)
            .map(|pair| format!("{},{}", pair[0], pair[1]))
            .collect::<Vec<_>>()
            .join(" ");
        let result = writeln!(self.writer, r#"<polygon points="{points}" fill="{}"/>"#, rgba(color));
        self.record(result);
    }
}
