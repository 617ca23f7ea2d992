//! Raster (PNG) output of choropleth maps.

use std::path::Path;

use anyhow::Result;
use geo::{Area, CoordsIter, LineString, MultiPolygon, Polygon as GeoPolygon};
use plotters::{
    coord::Shift,
    prelude::{BitMapBackend, Color, DrawingArea, IntoDrawingArea, IntoFont, PathElement, Polygon, RGBColor, Text},
};

use crate::{color::Rgb, render::{Canvas, Frame}};

#[inline]
fn rgb(color: Rgb) -> RGBColor { RGBColor(color.r, color.g, color.b) }

/// One polygon part waiting to be painted.
struct Part {
    /// Area enclosed by the exterior ring, in map units.
    area: f64,
    exterior: Vec<(i32, i32)>,
    holes: Vec<Vec<(i32, i32)>>,
    fill: Rgb,
    border: Rgb,
    border_width: u32,
}

/// Bitmap canvas.
///
/// Polygon fills cannot carry holes here, so parts are collected and painted on
/// [`finish`](Canvas::finish) from the largest exterior to the smallest: a
/// municipality lying in another's hole is always painted over its surroundings.
pub(crate) struct PngCanvas<'a> {
    root: DrawingArea<BitMapBackend<'a>, Shift>,
    frame: Frame,
    font_size: u32,
    parts: Vec<Part>,
    title: Option<String>,
}

impl<'a> PngCanvas<'a> {
    /// Canvas encoding to `path`. The path must end in `.png`.
    pub(crate) fn new(path: &'a Path, frame: Frame, font_size: u32) -> Self {
        let root = BitMapBackend::new(path, (frame.width, frame.height)).into_drawing_area();
        Self { root, frame, font_size, parts: Vec::new(), title: None }
    }

    /// Canvas drawing into a raw RGB buffer of `width * height * 3` bytes.
    pub(crate) fn with_buffer(buffer: &'a mut [u8], frame: Frame, font_size: u32) -> Self {
        let root = BitMapBackend::with_buffer(buffer, (frame.width, frame.height)).into_drawing_area();
        Self { root, frame, font_size, parts: Vec::new(), title: None }
    }

    /// Project a ring to pixel coordinates.
    fn ring_to_pixels(&self, ring: &LineString<f64>) -> Vec<(i32, i32)> {
        ring.coords_iter()
            .map(|coord| {
                let (x, y) = self.frame.project(&coord);
                (x.round() as i32, y.round() as i32)
            })
            .collect()
    }
}

impl Canvas for PngCanvas<'_> {
    fn fill_background(&mut self, color: Rgb) -> Result<()> {
        self.root.fill(&rgb(color))?;
        Ok(())
    }

    fn draw_polygon(&mut self, geometry: &MultiPolygon<f64>, fill: Rgb, border: Rgb, border_width: u32) -> Result<()> {
        for polygon in &geometry.0 {
            let exterior = self.ring_to_pixels(polygon.exterior());
            if exterior.is_empty() { continue }

            let area = GeoPolygon::new(polygon.exterior().clone(), vec![]).unsigned_area();
            let holes = polygon.interiors().iter()
                .map(|hole| self.ring_to_pixels(hole))
                .collect();
            self.parts.push(Part { area, exterior, holes, fill, border, border_width });
        }
        Ok(())
    }

    /// Empty titles are not drawn.
    fn draw_title(&mut self, title: &str) -> Result<()> {
        if !title.is_empty() {
            self.title = Some(title.to_string());
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let mut parts = std::mem::take(&mut self.parts);
        // stable: equal areas keep drawing order
        parts.sort_by(|a, b| b.area.total_cmp(&a.area));

        for part in parts {
            self.root.draw(&Polygon::new(part.exterior.clone(), rgb(part.fill).filled()))?;
            if part.border_width == 0 { continue }

            let stroke = rgb(part.border).stroke_width(part.border_width);
            self.root.draw(&PathElement::new(part.exterior, stroke))?;
            for hole in part.holes {
                self.root.draw(&PathElement::new(hole, stroke))?;
            }
        }

        if let Some(title) = self.title.take() {
            let style = ("sans-serif", self.font_size as f64)
                .into_font()
                .color(&rgb(Rgb::BLACK));
            let x = self.frame.margin.round() as i32;
            let y = (self.frame.margin + (self.frame.title_height - self.font_size as f64).max(0.0) / 2.0).round() as i32;
            self.root.draw(&Text::new(title, (x, y), style))?;
        }

        self.root.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use geo::{Coord, LineString, Polygon as GeoPolygon, Rect, polygon};

    use super::*;
    use crate::{
        color::Gradient,
        render::{Fill, Style, choropleth},
        types::JoinedRecord,
    };

    const SIZE: u32 = 100;

    fn frame() -> Frame {
        Frame::fit(Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 10.0, y: 10.0 }), SIZE, SIZE, 0, 0)
    }

    fn pixel(buffer: &[u8], x: u32, y: u32) -> Rgb {
        let i = ((y * SIZE + x) * 3) as usize;
        Rgb::new(buffer[i], buffer[i + 1], buffer[i + 2])
    }

    fn square(x0: f64, x1: f64) -> LineString<f64> {
        LineString::from(vec![(x0, x0), (x1, x0), (x1, x1), (x0, x1), (x0, x0)])
    }

    /// A 10x10 municipality with a 4x4 hole, and an enclave filling that hole.
    fn ring_and_enclave() -> (MultiPolygon<f64>, MultiPolygon<f64>) {
        let ring = MultiPolygon(vec![GeoPolygon::new(square(0.0, 10.0), vec![square(3.0, 7.0)])]);
        let enclave = MultiPolygon(vec![GeoPolygon::new(square(3.0, 7.0), vec![])]);
        (ring, enclave)
    }

    #[test]
    fn fills_polygon_pixels() {
        let mut buffer = vec![0u8; (SIZE * SIZE * 3) as usize];
        let fill = Rgb::new(200, 10, 10);
        {
            let mut canvas = PngCanvas::with_buffer(&mut buffer, frame(), 12);
            canvas.fill_background(Rgb::WHITE).unwrap();
            let left_half = MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 5.0, y: 0.0), (x: 5.0, y: 10.0), (x: 0.0, y: 10.0)]]);
            canvas.draw_polygon(&left_half, fill, Rgb::WHITE, 0).unwrap();
            canvas.draw_title("").unwrap();
            canvas.finish().unwrap();
        }
        assert_eq!(pixel(&buffer, 25, 50), fill);
        assert_eq!(pixel(&buffer, 75, 50), Rgb::WHITE);
    }

    #[test]
    fn enclave_keeps_its_color_when_surroundings_are_drawn_later() {
        let (ring, enclave) = ring_and_enclave();
        let style = Style::default();
        let records = vec![
            JoinedRecord { name: "Ring".into(), population: 1000, case_count: None, geometry: ring, rate: None },
            JoinedRecord { name: "Enclave".into(), population: 1000, case_count: Some(5), geometry: enclave, rate: Some(500.0) },
        ];
        let map = choropleth(&records, Gradient::Viridis, style, "").unwrap();
        let Fill::Rate(enclave_color) = map.features[1].fill else { panic!("enclave should be rated") };

        let mut buffer = vec![0u8; (SIZE * SIZE * 3) as usize];
        map.draw(&mut PngCanvas::with_buffer(&mut buffer, frame(), 12)).unwrap();

        // rated features are drawn before missing ones, so the ring comes last
        assert_eq!(pixel(&buffer, 50, 50), enclave_color);
        assert_eq!(pixel(&buffer, 10, 90), style.missing);
    }
}
