//! GeoJSON feature collection export

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, JsonObject, JsonValue};

use crate::pipeline::{ProcessingError, ProcessingResult};
use crate::types::RoomRecord;

/// Record fields left out of GeoJSON properties
const NON_PROPERTY_FIELDS: &[&str] = &["geometry", "attributes"];

/// Build the feature for one room
///
/// Properties hold the attribute map with the record's own fields layered on
/// top, so canonical fields always reflect the record itself.
pub fn record_to_feature(record: &RoomRecord) -> ProcessingResult<Feature> {
    let mut properties = JsonObject::new();
    for (key, value) in &record.attributes {
        properties.insert(key.clone(), serde_json::to_value(value)?);
    }

    if let JsonValue::Object(fields) = serde_json::to_value(record)? {
        for (key, value) in fields {
            if !NON_PROPERTY_FIELDS.contains(&key.as_str()) {
                properties.insert(key, value);
            }
        }
    }

    Ok(Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(&record.shape))),
        id: Some(Id::String(record.room_id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Build a feature collection from processed rooms
pub fn records_to_feature_collection(records: &[RoomRecord]) -> ProcessingResult<FeatureCollection> {
    if records.is_empty() {
        return Err(ProcessingError::NoRecords("export"));
    }

    let features = records
        .iter()
        .map(record_to_feature)
        .collect::<ProcessingResult<Vec<_>>>()?;

    Ok(FeatureCollection { bbox: None, features, foreign_members: None })
}
