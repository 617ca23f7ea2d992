use anyhow::{Result, bail};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile::{self as shp, PolygonRing, Shape};

/// Anything carrying planar x/y, regardless of M/Z extras.
trait PlanarPoint {
    fn coord(&self) -> Coord<f64>;
}

impl PlanarPoint for shp::Point {
    fn coord(&self) -> Coord<f64> { Coord { x: self.x, y: self.y } }
}

impl PlanarPoint for shp::PointM {
    fn coord(&self) -> Coord<f64> { Coord { x: self.x, y: self.y } }
}

impl PlanarPoint for shp::PointZ {
    fn coord(&self) -> Coord<f64> { Coord { x: self.x, y: self.y } }
}

/// Convert shapefile polygon rings to a geo::MultiPolygon<f64>.
///
/// Shapefiles store each outer ring followed by its holes, so every inner ring
/// is attached to the most recent outer ring.
fn rings_to_multipolygon<P: PlanarPoint>(rings: &[PolygonRing<P>]) -> MultiPolygon<f64> {
    /// Ensure first and last are the same for geo::LineString coords
    fn closed<P: PlanarPoint>(points: &[P]) -> LineString<f64> {
        let mut coords = points.iter().map(PlanarPoint::coord).collect::<Vec<_>>();
        if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
            if first != last { coords.push(first) }
        }
        LineString(coords)
    }

    let mut polys: Vec<Polygon<f64>> = Vec::new();
    let mut current_exterior: Option<LineString<f64>> = None;
    let mut current_holes: Vec<LineString<f64>> = Vec::new();

    for ring in rings {
        match ring {
            PolygonRing::Outer(points) => {
                // flush previous polygon
                if let Some(ext) = current_exterior.take() {
                    polys.push(Polygon::new(ext, std::mem::take(&mut current_holes)));
                }
                current_exterior = Some(closed(points));
            }
            PolygonRing::Inner(points) => current_holes.push(closed(points)),
        }
    }
    if let Some(ext) = current_exterior {
        polys.push(Polygon::new(ext, current_holes));
    }

    MultiPolygon(polys)
}

/// Convert a polygon shape (plain, M or Z) to a geo::MultiPolygon<f64>.
pub(crate) fn shape_to_multipolygon(shape: &Shape) -> Result<MultiPolygon<f64>> {
    match shape {
        Shape::Polygon(p) => Ok(rings_to_multipolygon(p.rings())),
        Shape::PolygonM(p) => Ok(rings_to_multipolygon(p.rings())),
        Shape::PolygonZ(p) => Ok(rings_to_multipolygon(p.rings())),
        Shape::NullShape => Ok(MultiPolygon(vec![])),
        other => bail!("expected a polygon shape, found {:?}", other.shapetype()),
    }
}
