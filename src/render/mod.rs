//! Choropleth construction and drawing.
//!
//! A [`ChoroplethMap`] is built in memory first (one fill per municipality) and
//! can then be drawn onto any [`Canvas`] as often as needed.

mod frame;

use std::path::Path;

use anyhow::{Context, Result};
use geo::MultiPolygon;

pub use frame::*;

use crate::{
    color::{Gradient, Rgb, colorize},
    common,
    config::RenderConfig,
    error::MapError,
    io::{png::PngCanvas, svg::SvgCanvas},
    types::{JoinedRecord, MunicipalityShape},
};

/// Drawing primitive the renderer is written against.
pub trait Canvas {
    /// Paint the whole canvas with `color`.
    fn fill_background(&mut self, color: Rgb) -> Result<()>;

    /// Draw one (multi)polygon with a fill and a uniform border.
    fn draw_polygon(&mut self, geometry: &MultiPolygon<f64>, fill: Rgb, border: Rgb, border_width: u32) -> Result<()>;

    /// Overlay the map title.
    fn draw_title(&mut self, title: &str) -> Result<()>;

    /// Flush everything to the underlying target.
    fn finish(&mut self) -> Result<()>;
}

/// Colors shared by every map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub missing: Rgb,
    pub placeholder: Rgb,
    pub border: Rgb,
    pub border_width: u32,
    pub background: Rgb,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            missing: Rgb::from_u32(0xbebebe),
            placeholder: Rgb::from_u32(0xd3d3d3),
            border: Rgb::from_u32(0xf0f0f0),
            border_width: 1,
            background: Rgb::WHITE,
        }
    }
}

/// How a municipality is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Colored by its rate on the gradient.
    Rate(Rgb),
    /// No rate available for the date.
    Missing(Rgb),
    /// Neutral color of the "pick a valid date" map.
    Placeholder(Rgb),
}

impl Fill {
    #[inline]
    pub fn color(&self) -> Rgb {
        match *self {
            Self::Rate(c) | Self::Missing(c) | Self::Placeholder(c) => c,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name: String,
    pub geometry: MultiPolygon<f64>,
    pub fill: Fill,
}

/// In-memory choropleth: title plus one filled geometry per municipality,
/// in the order the municipalities were given.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethMap {
    pub title: String,
    pub features: Vec<Feature>,
    /// Smallest and largest rate on the color scale, if any rate is present.
    pub scale: Option<(f64, f64)>,
    pub style: Style,
}

impl ChoroplethMap {
    /// Fill colors in feature order.
    pub fn fills(&self) -> Vec<Rgb> {
        self.features.iter().map(|feature| feature.fill.color()).collect()
    }

    /// Number of features drawn in the missing-data color.
    pub fn missing_count(&self) -> usize {
        self.features.iter().filter(|f| matches!(f.fill, Fill::Missing(_))).count()
    }

    /// Fit the map into a canvas of the given size.
    pub fn frame(&self, width: u32, height: u32, margin: u32, title_height: u32) -> Result<Frame, MapError> {
        let rect = bounds(self.features.iter().map(|f| &f.geometry))
            .ok_or(MapError::DegenerateInput("geometries have no extent"))?;
        Ok(Frame::fit(rect, width, height, margin, title_height))
    }

    /// Draw the map: rated municipalities first, then those without data.
    pub fn draw(&self, canvas: &mut impl Canvas) -> Result<()> {
        let (missing, rated): (Vec<&Feature>, Vec<&Feature>) = self.features.iter()
            .partition(|f| matches!(f.fill, Fill::Missing(_)));

        canvas.fill_background(self.style.background)?;
        for feature in rated.into_iter().chain(missing) {
            canvas.draw_polygon(&feature.geometry, feature.fill.color(), self.style.border, self.style.border_width)?;
        }
        canvas.draw_title(&self.title)?;
        canvas.finish()
    }

    /// Write the map as an image. `.svg` paths produce SVG, anything else PNG.
    ///
    /// The file is written next to `path` and renamed into place, so a failure
    /// leaves any previous output untouched.
    pub fn save(&self, path: &Path, config: &RenderConfig) -> Result<()> {
        let frame = self.frame(config.width, config.height, config.margin, config.title_height)?;
        let is_svg = path.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

        // the bitmap encoder picks its format from the extension of the file it writes
        let suffix = if is_svg { ".svg" } else { ".png" };
        common::write_atomically_with_suffix(path, suffix, |tmp| {
            if is_svg {
                self.draw(&mut SvgCanvas::create(tmp, frame, config.font_size)?)
            } else {
                self.draw(&mut PngCanvas::new(tmp, frame, config.font_size))
            }
        })
        .with_context(|| format!("[render] Failed to write map to {}", path.display()))?;

        log::info!("[render] wrote {} ({} municipalities, {} without data)",
            path.display(), self.features.len(), self.missing_count());
        Ok(())
    }
}

/// Build the choropleth for one date.
///
/// Records with a rate are colored by normalizing over all present rates at once;
/// records without one get `style.missing`. Fails on an empty record list.
pub fn choropleth(records: &[JoinedRecord], gradient: Gradient, style: Style, title: impl Into<String>) -> Result<ChoroplethMap, MapError> {
    if records.is_empty() {
        return Err(MapError::DegenerateInput("no municipalities to draw"))
    }

    let rates = records.iter().filter_map(|r| r.rate).collect::<Vec<_>>();
    let colors = if rates.is_empty() {
        log::warn!("[render] no municipality has a rate; drawing every municipality as missing");
        Vec::new()
    } else {
        colorize(&rates, gradient)?
    };
    let mut colors = colors.into_iter();

    let scale = rates.iter().copied()
        .fold(None, |acc: Option<(f64, f64)>, r| Some(acc.map_or((r, r), |(lo, hi)| (lo.min(r), hi.max(r)))));

    let features = records.iter()
        .map(|record| {
            let fill = record.rate
                .and_then(|_| colors.next())
                .map_or(Fill::Missing(style.missing), Fill::Rate);
            Feature { name: record.name.clone(), geometry: record.geometry.clone(), fill }
        })
        .collect();

    Ok(ChoroplethMap { title: title.into(), features, scale, style })
}

/// Build the "select a valid date" map: every shape in the placeholder color.
pub fn placeholder(shapes: &[MunicipalityShape], style: Style, title: impl Into<String>) -> Result<ChoroplethMap, MapError> {
    if shapes.is_empty() {
        return Err(MapError::DegenerateInput("no municipalities to draw"))
    }

    let features = shapes.iter()
        .map(|shape| Feature {
            name: shape.name.clone(),
            geometry: shape.geometry.clone(),
            fill: Fill::Placeholder(style.placeholder),
        })
        .collect();

    Ok(ChoroplethMap { title: title.into(), features, scale: None, style })
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;

    /// Canvas double that records every call.
    #[derive(Default)]
    struct Recorder {
        background: Option<Rgb>,
        polygons: Vec<(Rgb, Rgb, u32)>,
        title: Option<String>,
        finished: bool,
    }

    impl Canvas for Recorder {
        fn fill_background(&mut self, color: Rgb) -> Result<()> { self.background = Some(color); Ok(()) }

        fn draw_polygon(&mut self, _: &MultiPolygon<f64>, fill: Rgb, border: Rgb, border_width: u32) -> Result<()> {
            self.polygons.push((fill, border, border_width));
            Ok(())
        }

        fn draw_title(&mut self, title: &str) -> Result<()> { self.title = Some(title.to_string()); Ok(()) }

        fn finish(&mut self) -> Result<()> { self.finished = true; Ok(()) }
    }

    fn unit_square(x: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![(x: x, y: 0.0), (x: x + 1.0, y: 0.0), (x: x + 1.0, y: 1.0), (x: x, y: 1.0)]])
    }

    fn record(name: &str, x: f64, rate: Option<f64>) -> JoinedRecord {
        JoinedRecord { name: name.into(), population: 1000, case_count: None, geometry: unit_square(x), rate }
    }

    #[test]
    fn missing_rates_are_partitioned() {
        let style = Style::default();
        let records = vec![record("a", 0.0, Some(10.0)), record("b", 1.0, None), record("c", 2.0, Some(30.0))];
        let map = choropleth(&records, Gradient::Viridis, style, "t").unwrap();

        assert_eq!(map.missing_count(), 1);
        assert_eq!(map.fills(), vec![Gradient::Viridis.at(0.0), style.missing, Gradient::Viridis.at(1.0)]);
        assert_eq!(map.scale, Some((10.0, 30.0)));

        let mut canvas = Recorder::default();
        map.draw(&mut canvas).unwrap();
        let missing_draws = canvas.polygons.iter().filter(|(fill, _, _)| *fill == style.missing).count();
        assert_eq!(missing_draws, 1);
        assert_eq!(canvas.polygons.len(), 3);
        // rated first, missing last
        assert_eq!(canvas.polygons[2].0, style.missing);
        assert!(canvas.polygons.iter().all(|&(_, border, width)| border == style.border && width == style.border_width));
        assert_eq!(canvas.background, Some(style.background));
        assert_eq!(canvas.title.as_deref(), Some("t"));
        assert!(canvas.finished);
    }

    #[test]
    fn all_missing_draws_grey() {
        let style = Style::default();
        let records = vec![record("a", 0.0, None), record("b", 1.0, None)];
        let map = choropleth(&records, Gradient::Heat, style, "t").unwrap();
        assert_eq!(map.fills(), vec![style.missing; 2]);
        assert_eq!(map.scale, None);
    }

    #[test]
    fn empty_records_fail() {
        let err = choropleth(&[], Gradient::Viridis, Style::default(), "t").unwrap_err();
        assert!(matches!(err, MapError::DegenerateInput(_)));
    }

    #[test]
    fn building_twice_gives_same_colors() {
        let records = vec![record("a", 0.0, Some(1.0)), record("b", 1.0, Some(2.5)), record("c", 2.0, Some(4.0))];
        let first = choropleth(&records, Gradient::Inferno, Style::default(), "t").unwrap();
        let second = choropleth(&records, Gradient::Inferno, Style::default(), "t").unwrap();
        assert_eq!(first.fills(), second.fills());
    }

    #[test]
    fn placeholder_uses_neutral_color() {
        let style = Style::default();
        let shapes = vec![
            MunicipalityShape::new("a", 10, unit_square(0.0)),
            MunicipalityShape::new("b", 10, unit_square(1.0)),
        ];
        let map = placeholder(&shapes, style, "pick a date").unwrap();
        assert_eq!(map.fills(), vec![style.placeholder; 2]);
        assert!(map.features.iter().all(|f| matches!(f.fill, Fill::Placeholder(_))));
        assert!(placeholder(&[], style, "x").is_err());
    }

    #[test]
    fn frame_requires_extent() {
        let records = vec![JoinedRecord {
            name: "empty".into(), population: 1, case_count: None, geometry: MultiPolygon(vec![]), rate: None,
        }];
        let map = choropleth(&records, Gradient::Viridis, Style::default(), "t").unwrap();
        assert!(map.frame(100, 100, 0, 0).is_err());
    }
}
