//! Field-name reconciliation
//!
//! Shapefiles from different sources spell the same column many ways. Each
//! canonical attribute has a static list of aliases; the first alias present
//! with a non-null value wins (exact, case-sensitive match). Columns that are
//! not an alias of anything are carried over under a `raw_` prefix.

use std::collections::BTreeMap;

use crate::source::SourceFeature;
use crate::types::AttributeValue;

/// Canonical attribute names
pub mod canonical {
    /// Room number
    pub const ROOM_NUMBER: &str = "room_number";
    /// Room name
    pub const ROOM_NAME: &str = "room_name";
    /// Building identifier
    pub const BUILDING_ID: &str = "building_id";
    /// Floor level
    pub const FLOOR_LEVEL: &str = "floor_level";
    /// Room type
    pub const ROOM_TYPE: &str = "room_type";
    /// Owning department
    pub const DEPARTMENT: &str = "department";
    /// Seating capacity
    pub const CAPACITY: &str = "capacity";
}

/// Prefix applied to source columns with no canonical mapping
pub const RAW_PREFIX: &str = "raw_";

/// Canonical attribute name paired with its aliases, in priority order
pub const FIELD_ALIASES: &[(&str, &[&str])] = &[
    (canonical::ROOM_NUMBER, &["ROOM_NUM", "ROOM_NO", "Room_Num", "RoomNumber", "room_num"]),
    (canonical::ROOM_NAME, &["ROOM_NAME", "Room_Name", "RoomName", "NAME", "room_name"]),
    (canonical::BUILDING_ID, &["BUILDING", "Building", "BLDG", "building_id"]),
    (canonical::FLOOR_LEVEL, &["FLOOR", "Floor", "LEVEL", "Level", "floor_level"]),
    (canonical::ROOM_TYPE, &["TYPE", "Type", "ROOM_TYPE", "Room_Type", "room_type"]),
    (canonical::DEPARTMENT, &["DEPT", "Department", "DEPARTMENT", "dept"]),
    (canonical::CAPACITY, &["CAPACITY", "Capacity", "capacity"]),
];

/// Check whether a source column is an alias of some canonical attribute
pub fn is_alias(field: &str) -> bool {
    FIELD_ALIASES.iter().any(|(_, aliases)| aliases.contains(&field))
}

/// Extract canonical attributes and `raw_` passthrough columns from a feature
pub fn extract_room_attributes(feature: &SourceFeature) -> BTreeMap<String, AttributeValue> {
    let mut attributes = BTreeMap::new();

    for (name, aliases) in FIELD_ALIASES {
        if let Some(value) = aliases.iter().find_map(|alias| feature.field(alias)) {
            attributes.insert(name.to_string(), value.clone());
        }
    }

    for (field, value) in &feature.fields {
        if value.is_null() || is_alias(field) {
            continue;
        }
        attributes.insert(format!("{}{}", RAW_PREFIX, field), value.clone());
    }

    attributes
}
