//! Pipeline orchestration and control
//!
//! This module contains the processor that drives a run, the error types and
//! the logging setup.
//!
//! # Overview
//!
//! - **ShapefileProcessor**: reads, normalizes, validates and exports rooms
//! - **ProcessingSummary**: outcome counts of a processing pass
//! - **ProcessingError**: fatal and per-feature error handling
//! - **LoggingConfig**: `tracing` subscriber setup
//!
//! # Usage Example
//!
//! ```rust
//! use shapefile_room_processor::pipeline::*;
//! use shapefile_room_processor::source::SourceFeature;
//! use shapefile_room_processor::types::ProcessingConfig;
//! use geo_types::polygon;
//! use std::collections::BTreeMap;
//!
//! let mut processor = ShapefileProcessor::new(ProcessingConfig::default()).unwrap();
//!
//! let room = geo_types::polygon![
//!     (x: 0.0, y: 0.0),
//!     (x: 4.0, y: 0.0),
//!     (x: 4.0, y: 3.0),
//!     (x: 0.0, y: 3.0),
//! ];
//! let features = vec![SourceFeature::new(0, Some(room.into()), BTreeMap::new())];
//!
//! let rooms = processor.process_features(features);
//! assert_eq!(rooms[0].room_id.as_str(), "T_1_R0000");
//!
//! let report = processor.validate_processed_data().unwrap();
//! assert_eq!(report.total_rooms, 1);
//! ```

pub mod error;
pub mod logging;
pub mod processor;

// Re-export all public types for convenience
pub use error::*;
pub use logging::*;
pub use processor::*;
