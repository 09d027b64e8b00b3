//! Per-feature normalization
//!
//! This module turns raw shapefile features into [`RoomRecord`]s:
//!
//! - **Geometry**: empty checks, validity, a single zero-width repair pass,
//!   planar area and centroid
//! - **Field mapping**: alias table reconciliation into canonical attributes
//! - **Accessibility**: boolean-like flag inference with an accessible default
//! - **Normalizer**: the per-feature state-free transformation tying it together
//!
//! [`RoomRecord`]: crate::types::RoomRecord

pub mod accessibility;
pub mod field_mapping;
pub mod geometry;
pub mod normalizer;

pub use accessibility::{determine_accessibility, ACCESSIBILITY_FIELDS};
pub use field_mapping::{extract_room_attributes, FIELD_ALIASES, RAW_PREFIX};
pub use geometry::{check_geometry, geometry_type_name, GeometryCheck, RoomShape};
pub use normalizer::*;
