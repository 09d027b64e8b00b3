//! Shapefile reading
//!
//! Opens the `.shp`/`.shx`/`.dbf` triple with the `shapefile` crate and turns
//! every shape/record pair into a [`SourceFeature`]. The coordinate reference
//! system is taken verbatim from the `.prj` sidecar when one exists.

use geo_types::Geometry;
use shapefile::dbase::FieldValue;
use shapefile::Shape;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use super::{Dataset, SourceFeature};
use crate::pipeline::{NormalizeError, ProcessingError, ProcessingResult};
use crate::types::AttributeValue;

/// Read every feature of a shapefile
///
/// A missing file or any read failure is fatal for the run.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_shapefile(path: &Path) -> ProcessingResult<Dataset> {
    if !path.exists() {
        return Err(ProcessingError::InputNotFound(path.to_path_buf()));
    }

    let mut reader = shapefile::Reader::from_path(path)
        .map_err(|e| ProcessingError::read_error(path, e))?;

    let mut features = Vec::new();
    for (index, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = result.map_err(|e| ProcessingError::read_error(path, e))?;

        let fields: BTreeMap<String, AttributeValue> = HashMap::<String, FieldValue>::from(record)
            .into_iter()
            .map(|(name, value)| (name, convert_field_value(value)))
            .collect();

        let geometry = shape_to_geometry(shape).unwrap_or_else(|e| {
            warn!("Feature {}: {}; geometry left empty", index, e);
            None
        });
        features.push(SourceFeature::new(index, geometry, fields));
    }

    let dataset = Dataset::from_features(features, read_crs(path));

    info!("Loaded {} features from shapefile", dataset.summary.record_count);
    info!("CRS: {}", dataset.summary.crs.as_deref().unwrap_or("unknown"));
    info!("Columns: {:?}", dataset.summary.columns);
    info!("Geometry types: {:?}", dataset.summary.geometry_types);

    Ok(dataset)
}

/// Read the `.prj` sidecar next to a shapefile, if any
pub fn read_crs(path: &Path) -> Option<String> {
    let prj_path = path.with_extension("prj");
    match fs::read_to_string(&prj_path) {
        Ok(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Err(e) => {
            debug!("No projection read from {}: {}", prj_path.display(), e);
            None
        }
    }
}

/// Convert a shapefile shape into a `geo_types` geometry
///
/// Null shapes yield `None`. Shapes with no `geo_types` counterpart, such as
/// triangle-strip multipatches, are an error.
pub fn shape_to_geometry(shape: Shape) -> Result<Option<Geometry<f64>>, NormalizeError> {
    let shape_type = shape.shapetype();
    match shape {
        Shape::NullShape => Ok(None),
        other => Geometry::<f64>::try_from(other).map(Some).map_err(|e| {
            NormalizeError::UnsupportedGeometry(format!("{} ({})", shape_type, e))
        }),
    }
}

/// Convert a dBase field value into an [`AttributeValue`]
pub fn convert_field_value(value: FieldValue) -> AttributeValue {
    match value {
        FieldValue::Character(Some(text)) | FieldValue::Memo(text) => text_value(&text),
        FieldValue::Numeric(Some(number)) => AttributeValue::from_number(number),
        FieldValue::Float(Some(number)) => AttributeValue::Float(f64::from(number)),
        FieldValue::Double(number) | FieldValue::Currency(number) => AttributeValue::Float(number),
        FieldValue::Integer(number) => AttributeValue::Integer(i64::from(number)),
        FieldValue::Logical(Some(flag)) => AttributeValue::Bool(flag),
        FieldValue::Date(Some(date)) => AttributeValue::Text(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        )),
        FieldValue::DateTime(datetime) => {
            let date = datetime.date();
            let time = datetime.time();
            AttributeValue::Text(format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
                date.year(),
                date.month(),
                date.day(),
                time.hours(),
                time.minutes(),
                time.seconds()
            ))
        }
        _ => AttributeValue::Null,
    }
}

/// Padded or blank dBase text; blank values are treated as missing
fn text_value(text: &str) -> AttributeValue {
    match text.trim() {
        "" => AttributeValue::Null,
        trimmed => AttributeValue::Text(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapefile::{Multipatch, Patch, Point, PointZ, PolygonRing, NO_DATA};

    #[test]
    fn test_convert_field_values() {
        assert_eq!(
            convert_field_value(FieldValue::Character(Some("Lab".to_string()))),
            AttributeValue::from("Lab")
        );
        assert_eq!(convert_field_value(FieldValue::Character(None)), AttributeValue::Null);
        assert_eq!(
            convert_field_value(FieldValue::Character(Some("   ".to_string()))),
            AttributeValue::Null
        );
        assert_eq!(
            convert_field_value(FieldValue::Character(Some("101   ".to_string()))),
            AttributeValue::from("101")
        );
        assert_eq!(convert_field_value(FieldValue::Numeric(Some(2.0))), AttributeValue::Integer(2));
        assert_eq!(convert_field_value(FieldValue::Numeric(Some(2.5))), AttributeValue::Float(2.5));
        assert_eq!(convert_field_value(FieldValue::Logical(Some(false))), AttributeValue::Bool(false));
        assert_eq!(convert_field_value(FieldValue::Integer(40)), AttributeValue::Integer(40));
    }

    #[test]
    fn test_null_shape_has_no_geometry() {
        assert!(matches!(shape_to_geometry(Shape::NullShape), Ok(None)));
    }

    #[test]
    fn test_polygon_shape_converts() {
        let ring = PolygonRing::Outer(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 2.0),
            Point::new(2.0, 2.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 0.0),
        ]);
        let shape = Shape::Polygon(shapefile::Polygon::new(ring));
        assert!(matches!(shape_to_geometry(shape), Ok(Some(Geometry::MultiPolygon(_)))));
    }

    #[test]
    fn test_unconvertible_shape_is_reported() {
        let strip = Patch::TriangleStrip(vec![
            PointZ::new(0.0, 0.0, 0.0, NO_DATA),
            PointZ::new(0.0, 1.0, 0.0, NO_DATA),
            PointZ::new(1.0, 0.0, 0.0, NO_DATA),
        ]);
        let shape = Shape::Multipatch(Multipatch::new(strip));

        match shape_to_geometry(shape) {
            Err(NormalizeError::UnsupportedGeometry(message)) => {
                assert!(message.contains("TriangleStrip"));
            }
            other => panic!("Expected unsupported geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_shapefile_is_fatal() {
        let result = read_shapefile(Path::new("no/such/BuildingTRooms.shp"));
        assert!(matches!(result, Err(ProcessingError::InputNotFound(_))));
    }

    #[test]
    fn test_read_crs_from_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let shp = dir.path().join("rooms.shp");
        assert!(read_crs(&shp).is_none());

        fs::write(dir.path().join("rooms.prj"), "PROJCS[\"NAD83 / UTM zone 10N\"]\n").unwrap();
        assert_eq!(read_crs(&shp).as_deref(), Some("PROJCS[\"NAD83 / UTM zone 10N\"]"));
    }
}
