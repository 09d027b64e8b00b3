//! Per-feature normalization
//!
//! Turns one [`SourceFeature`] into a [`RoomRecord`], or explains why the
//! feature was skipped. Skips are expected outcomes; errors are failures of a
//! single feature. Neither aborts the batch.

use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

use super::accessibility::determine_accessibility;
use super::field_mapping::{canonical, extract_room_attributes};
use super::geometry::{check_geometry, is_empty_geometry, GeometryCheck};
use crate::pipeline::NormalizeError;
use crate::source::SourceFeature;
use crate::types::{AttributeValue, ProcessingSection, RoomId, RoomRecord};

/// Room type used when the source has none
pub const UNKNOWN_ROOM_TYPE: &str = "unknown";

/// Why a feature produced no room
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Geometry missing, null or without coordinates
    EmptyGeometry,
    /// Geometry invalid even after the repair pass
    UnrepairableGeometry,
    /// Planar area below the configured minimum
    BelowMinimumArea {
        /// Area of the feature
        area: f64,
        /// Configured minimum
        minimum: f64,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyGeometry => write!(f, "empty geometry"),
            SkipReason::UnrepairableGeometry => write!(f, "invalid geometry could not be fixed"),
            SkipReason::BelowMinimumArea { area, minimum } => {
                write!(f, "area {:.2} < {}", area, minimum)
            }
        }
    }
}

/// Outcome of normalizing one feature
#[derive(Debug, Clone)]
pub enum FeatureOutcome {
    /// Feature became a room
    Accepted(Box<RoomRecord>),
    /// Feature was dropped
    Skipped(SkipReason),
}

/// Normalizes features using the `processing` configuration
#[derive(Debug, Clone)]
pub struct RoomNormalizer {
    min_room_area: f64,
    default_building_id: String,
    default_floor_level: i64,
}

impl RoomNormalizer {
    /// Create a normalizer from the processing settings
    pub fn new(settings: &ProcessingSection) -> Self {
        Self {
            min_room_area: settings.min_room_area,
            default_building_id: settings.default_building_id.clone(),
            default_floor_level: settings.default_floor_level,
        }
    }

    /// Normalize a single feature
    pub fn normalize(&self, feature: &SourceFeature) -> Result<FeatureOutcome, NormalizeError> {
        let index = feature.index;

        let geometry = match &feature.geometry {
            Some(geometry) if !is_empty_geometry(geometry) => geometry,
            _ => {
                warn!("Empty geometry at index {}", index);
                return Ok(FeatureOutcome::Skipped(SkipReason::EmptyGeometry));
            }
        };

        let shape = match check_geometry(geometry)? {
            GeometryCheck::Valid(shape) => shape,
            GeometryCheck::Repaired(shape) => {
                warn!("Invalid geometry at index {}, repaired with a zero-width buffer", index);
                shape
            }
            GeometryCheck::Unrepairable => {
                warn!("Could not fix geometry at index {}", index);
                return Ok(FeatureOutcome::Skipped(SkipReason::UnrepairableGeometry));
            }
        };

        let area = shape.area();
        if area < self.min_room_area {
            debug!(
                "Skipping room at index {}: area {:.2} < {}",
                index, area, self.min_room_area
            );
            return Ok(FeatureOutcome::Skipped(SkipReason::BelowMinimumArea {
                area,
                minimum: self.min_room_area,
            }));
        }

        let centroid = shape.centroid()?;
        let attributes = extract_room_attributes(feature);

        let room_number = text_attribute(&attributes, canonical::ROOM_NUMBER);
        let building_id = text_attribute(&attributes, canonical::BUILDING_ID)
            .unwrap_or_else(|| self.default_building_id.clone());
        let floor_level = self.floor_level(&attributes, index);
        let room_id = generate_room_id(&building_id, floor_level, room_number.as_deref(), index);

        let record = RoomRecord {
            room_id,
            room_number,
            room_name: text_attribute(&attributes, canonical::ROOM_NAME),
            building_id,
            floor_level,
            room_type: text_attribute(&attributes, canonical::ROOM_TYPE)
                .unwrap_or_else(|| UNKNOWN_ROOM_TYPE.to_string()),
            area_sqm: area,
            centroid_x: centroid.x(),
            centroid_y: centroid.y(),
            is_accessible: determine_accessibility(feature),
            geometry: shape.to_wkt(),
            attributes,
            shape: shape.geometry,
        };

        Ok(FeatureOutcome::Accepted(Box::new(record)))
    }

    fn floor_level(&self, attributes: &BTreeMap<String, AttributeValue>, index: usize) -> i64 {
        match attributes.get(canonical::FLOOR_LEVEL) {
            None => self.default_floor_level,
            Some(value) => value.as_integer().unwrap_or_else(|| {
                warn!(
                    "Unrecognized floor level {:?} at index {}, using {}",
                    value, index, self.default_floor_level
                );
                self.default_floor_level
            }),
        }
    }
}

/// Compose a room identifier, falling back to `R<index>` without a room number
pub fn generate_room_id(
    building_id: &str,
    floor_level: i64,
    room_number: Option<&str>,
    index: usize,
) -> RoomId {
    match room_number {
        Some(number) => RoomId::from_parts(building_id, floor_level, number),
        None => RoomId::from_parts(building_id, floor_level, &format!("R{:04}", index)),
    }
}

fn text_attribute(attributes: &BTreeMap<String, AttributeValue>, name: &str) -> Option<String> {
    attributes.get(name).and_then(AttributeValue::as_text)
}
