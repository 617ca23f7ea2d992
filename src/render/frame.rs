use geo::{BoundingRect, Coord, MultiPolygon, Rect};

/// Placement of planar map coordinates on a pixel canvas.
///
/// Preserves aspect ratio, inverts the Y axis and reserves a band at the top
/// for the title. No reprojection is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub margin: f64,
    pub title_height: f64,
    bounds: Rect<f64>,
    scale: f64,
    offset: (f64, f64),
}

impl Frame {
    /// Fit `bounds` into a `width` x `height` canvas.
    pub fn fit(bounds: Rect<f64>, width: u32, height: u32, margin: u32, title_height: u32) -> Self {
        let margin = margin as f64;
        let title_height = title_height as f64;
        let avail_w = (width as f64 - 2.0 * margin).max(1.0);
        let avail_h = (height as f64 - 2.0 * margin - title_height).max(1.0);

        let sx = if bounds.width() > 0.0 { avail_w / bounds.width() } else { f64::INFINITY };
        let sy = if bounds.height() > 0.0 { avail_h / bounds.height() } else { f64::INFINITY };
        let scale = match sx.min(sy) {
            s if s.is_finite() => s,
            _ => 1.0, // all geometry collapsed to a single point
        };

        let offset = (
            margin + (avail_w - bounds.width() * scale) / 2.0,
            margin + title_height + (avail_h - bounds.height() * scale) / 2.0,
        );

        Self { width, height, margin, title_height, bounds, scale, offset }
    }

    #[inline] pub fn bounds(&self) -> &Rect<f64> { &self.bounds }

    #[inline] pub fn scale(&self) -> f64 { self.scale }

    /// Map coordinates -> canvas pixels (x right, y down).
    #[inline]
    pub fn project(&self, coord: &Coord<f64>) -> (f64, f64) {
        let x = self.offset.0 + (coord.x - self.bounds.min().x) * self.scale;
        let y = self.offset.1 + (self.bounds.max().y - coord.y) * self.scale; // invert vertically
        (x, y)
    }
}

/// Bounding rectangle of all geometries, `None` when nothing has extent.
pub fn bounds<'a>(shapes: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Option<Rect<f64>> {
    shapes.into_iter()
        .filter_map(|polygon| polygon.bounding_rect())
        .reduce(|a, b| Rect::new(
            Coord {
                x: a.min().x.min(b.min().x),
                y: a.min().y.min(b.min().y),
            },
            Coord {
                x: a.max().x.max(b.max().x),
                y: a.max().y.max(b.max().y),
            }
        ))
}
