//! Geometry checks and measurements
//!
//! All math is delegated to `geo`: validity, area, centroid and the boolean
//! overlay used for repair. WKT encoding comes from `wkt`.

use geo::{Area, BooleanOps, Centroid, HasDimensions, Validation};
use geo_types::{Geometry, MultiPolygon, Point, Polygon};
use wkt::ToWkt;

use crate::pipeline::NormalizeError;

/// Result of checking a feature geometry
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryCheck {
    /// Geometry was valid as read
    Valid(RoomShape),
    /// Geometry was invalid and the repair pass fixed it
    Repaired(RoomShape),
    /// Geometry was invalid and stayed invalid (or empty) after repair
    Unrepairable,
}

/// An areal geometry ready for measurement
#[derive(Debug, Clone, PartialEq)]
pub struct RoomShape {
    /// Geometry to export (polygon or multipolygon)
    pub geometry: Geometry<f64>,
    /// Same geometry as a polygon set
    pub polygons: MultiPolygon<f64>,
}

impl RoomShape {
    /// Planar area in square units of the source CRS
    pub fn area(&self) -> f64 {
        self.polygons.unsigned_area()
    }

    /// Area-weighted centroid
    pub fn centroid(&self) -> Result<Point<f64>, NormalizeError> {
        self.polygons.centroid().ok_or(NormalizeError::CentroidUnavailable)
    }

    /// Geometry as well-known text
    pub fn to_wkt(&self) -> String {
        self.geometry.wkt_string()
    }
}

/// Name of a geometry's type, as used in logs and dataset summaries
pub fn geometry_type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Check whether a geometry has no coordinates
pub fn is_empty_geometry(geometry: &Geometry<f64>) -> bool {
    geometry.is_empty()
}

/// View an areal geometry as a polygon set
pub fn to_polygons(geometry: &Geometry<f64>) -> Result<MultiPolygon<f64>, NormalizeError> {
    match geometry {
        Geometry::Polygon(polygon) => Ok(MultiPolygon::new(vec![polygon.clone()])),
        Geometry::MultiPolygon(polygons) => Ok(polygons.clone()),
        Geometry::Rect(rect) => Ok(MultiPolygon::new(vec![rect.to_polygon()])),
        Geometry::Triangle(triangle) => Ok(MultiPolygon::new(vec![triangle.to_polygon()])),
        other => Err(NormalizeError::UnsupportedGeometry(geometry_type_name(other).to_string())),
    }
}

/// Zero-width repair: re-node the polygon set one member at a time
///
/// Each member is unioned into the running result. Self-intersections are
/// split at their crossing points and overlapping members are merged, which
/// is what a zero-distance buffer does.
pub fn repair(polygons: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    polygons
        .0
        .iter()
        .fold(MultiPolygon::new(Vec::new()), |merged, polygon| merged.union(polygon))
}

/// Validate a geometry and run a single repair pass when it is invalid
pub fn check_geometry(geometry: &Geometry<f64>) -> Result<GeometryCheck, NormalizeError> {
    let polygons = to_polygons(geometry)?;

    if polygons.is_valid() {
        return Ok(GeometryCheck::Valid(RoomShape { geometry: collapse(&polygons), polygons }));
    }

    let repaired = repair(&polygons);
    if repaired.is_empty() || !repaired.is_valid() {
        return Ok(GeometryCheck::Unrepairable);
    }

    Ok(GeometryCheck::Repaired(RoomShape { geometry: collapse(&repaired), polygons: repaired }))
}

/// A single-member polygon set becomes a plain polygon
fn collapse(polygons: &MultiPolygon<f64>) -> Geometry<f64> {
    match polygons.0.as_slice() {
        [single] => Geometry::Polygon(Polygon::clone(single)),
        _ => Geometry::MultiPolygon(polygons.clone()),
    }
}
