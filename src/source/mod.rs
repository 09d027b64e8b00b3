//! Input dataset access
//!
//! This module reads the building rooms shapefile and exposes its records as
//! plain [`SourceFeature`] values so normalization never depends on the
//! shapefile format itself.

pub mod feature;
pub mod reader;

pub use feature::*;
pub use reader::*;
