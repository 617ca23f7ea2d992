//! SVG output of choropleth maps.

mod writer;

use std::{io::Write, path::Path};

use anyhow::Result;
use geo::{CoordsIter, LineString, MultiPolygon};

use crate::{color::Rgb, render::{Canvas, Frame}};

use writer::{SvgWriter, escape_text};

/// Vector canvas writing one `<path>` per municipality.
pub(crate) struct SvgCanvas {
    writer: SvgWriter,
    frame: Frame,
    font_size: u32,
}

impl SvgCanvas {
    /// Create the file at `path` and write the SVG header.
    pub(crate) fn create(path: &Path, frame: Frame, font_size: u32) -> Result<Self> {
        let mut writer = SvgWriter::new(path)?;
        writer.write_header(frame.width, frame.height, frame.bounds())?;
        Ok(Self { writer, frame, font_size })
    }

    /// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
    fn multipolygon_to_path(&self, shape: &MultiPolygon<f64>) -> String {
        let mut out = String::new();

        for polygon in &shape.0 {
            self.ring_to_path(polygon.exterior(), &mut out);
            for interior in polygon.interiors() {
                self.ring_to_path(interior, &mut out);
            }
        }

        out
    }

    /// Append a ring as an SVG subpath: "M x,y L x,y ... Z"
    fn ring_to_path(&self, ring: &LineString<f64>, out: &mut String) {
        let mut coords = ring.coords_iter()
            .map(|coord| self.frame.project(&coord));
        if let Some((x, y)) = coords.next() {
            out.push_str(&format!(" M{x:.3},{y:.3}"));
            for (x, y) in coords {
                out.push_str(&format!(" L{x:.3},{y:.3}"));
            }
            out.push('Z');
        }
    }
}

impl Canvas for SvgCanvas {
    fn fill_background(&mut self, color: Rgb) -> Result<()> {
        writeln!(self.writer, r##"<rect width="100%" height="100%" fill="{}"/>"##, color.hex())?;
        Ok(())
    }

    fn draw_polygon(&mut self, geometry: &MultiPolygon<f64>, fill: Rgb, border: Rgb, border_width: u32) -> Result<()> {
        let path = self.multipolygon_to_path(geometry);
        writeln!(self.writer,
            r#"<path d="{path}" fill="{}" fill-rule="evenodd" stroke="{}" stroke-width="{border_width}"/>"#,
            fill.hex(),
            border.hex(),
        )?;
        Ok(())
    }

    fn draw_title(&mut self, title: &str) -> Result<()> {
        let x = self.frame.margin;
        let y = self.frame.margin + self.frame.title_height / 2.0;
        writeln!(self.writer,
            r#"<text x="{x:.1}" y="{y:.1}" font-family="sans-serif" font-size="{}" dominant-baseline="middle">{}</text>"#,
            self.font_size,
            escape_text(title),
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.write_footer()?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use geo::{Coord, Rect, polygon};

    use super::*;

    #[test]
    fn writes_paths_and_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.svg");
        let frame = Frame::fit(Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 10.0, y: 10.0 }), 120, 140, 10, 20);

        let mut canvas = SvgCanvas::create(&path, frame, 16).unwrap();
        canvas.fill_background(Rgb::WHITE).unwrap();
        let square = MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)]]);
        canvas.draw_polygon(&square, Rgb::new(1, 2, 3), Rgb::new(240, 240, 240), 1).unwrap();
        canvas.draw_title("Cases <per> 100k & more").unwrap();
        canvas.finish().unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r##"fill="#010203""##));
        assert!(svg.contains(r##"stroke="#f0f0f0""##));
        assert!(svg.contains(" M10.000,130.000"));
        assert!(svg.contains("Cases &lt;per&gt; 100k &amp; more"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
