//! Normalized room records
//!
//! A [`RoomRecord`] is produced once per accepted input feature and is the unit
//! consumed by validation and every exporter.

use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::AttributeValue;

/// Identifier of a room, composed as `<building>_<floor>_<room number>`
///
/// Uniqueness is not guaranteed: two features sharing building, floor and room
/// number produce the same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Compose an identifier from its parts
    pub fn from_parts(building_id: &str, floor_level: i64, room_number: &str) -> Self {
        Self(format!("{}_{}_{}", building_id, floor_level, room_number))
    }

    /// Borrow the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A single normalized room
#[derive(Debug, Clone, Serialize)]
pub struct RoomRecord {
    /// Derived room identifier
    pub room_id: RoomId,
    /// Room number as found in the source, if any
    pub room_number: Option<String>,
    /// Room name as found in the source, if any
    pub room_name: Option<String>,
    /// Building the room belongs to
    pub building_id: String,
    /// Floor level
    pub floor_level: i64,
    /// Room type, `"unknown"` when the source has none
    pub room_type: String,
    /// Planar area in square units of the source CRS
    pub area_sqm: f64,
    /// Centroid X coordinate
    pub centroid_x: f64,
    /// Centroid Y coordinate
    pub centroid_y: f64,
    /// Whether the room is wheelchair accessible
    pub is_accessible: bool,
    /// Geometry as well-known text
    pub geometry: String,
    /// Canonical attributes plus every unmapped source field under a `raw_` prefix
    pub attributes: BTreeMap<String, AttributeValue>,
    /// Parsed geometry backing `geometry`
    #[serde(skip)]
    pub shape: Geometry<f64>,
}

impl RoomRecord {
    /// Key used to group rooms per floor, e.g. `T_F2`
    pub fn floor_key(&self) -> String {
        format!("{}_F{}", self.building_id, self.floor_level)
    }
}
