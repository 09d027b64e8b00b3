//! Shapefile Room Processor
//!
//! Converts a building floor shapefile into normalized room records and emits
//! validation statistics plus GeoJSON and JSON exports.
//!
//! # Overview
//!
//! Every run is a single linear pass over one input dataset, driven by a YAML
//! configuration whose values may reference environment variables as
//! `${VAR}` or `${VAR:default}`.
//!
//! ## Key Features
//!
//! - **Field Reconciliation**: A static alias table maps inconsistent shapefile
//!   schemas onto canonical room attributes
//! - **Geometry Repair**: Invalid polygons get a single zero-width repair pass
//! - **Accessibility Inference**: Boolean-like flags from a fixed list of columns
//! - **Aggregate Validation**: Per-building, per-floor and per-type counts, area
//!   statistics and data-quality thresholds
//! - **Export**: GeoJSON feature collection, JSON records and a validation report
//!
//! ## Quick Start
//!
//! ```rust
//! use shapefile_room_processor::*;
//! use geo_types::polygon;
//! use std::collections::BTreeMap;
//!
//! let config = ProcessingConfig::from_yaml_str_with(
//!     "processing:\n  min_room_area: ${MIN_AREA:5.0}\n",
//!     |_| None,
//! )?;
//! let mut processor = ShapefileProcessor::new(config)?;
//!
//! let mut fields = BTreeMap::new();
//! fields.insert("BUILDING".to_string(), AttributeValue::from("T"));
//! fields.insert("FLOOR".to_string(), AttributeValue::Integer(2));
//! fields.insert("ROOM_NUM".to_string(), AttributeValue::from("101"));
//!
//! let room = geo_types::polygon![
//!     (x: 0.0, y: 0.0),
//!     (x: 10.0, y: 0.0),
//!     (x: 10.0, y: 10.0),
//!     (x: 0.0, y: 10.0),
//! ];
//! let rooms = processor.process_features(vec![SourceFeature::new(0, Some(room.into()), fields)]);
//! assert_eq!(rooms[0].room_id.as_str(), "T_2_101");
//! assert_eq!(rooms[0].area_sqm, 100.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Configuration, room records and attribute values
//! - [`source`]: Shapefile reading
//! - [`normalize`]: Per-feature normalization
//! - [`validation`]: Aggregate validation report
//! - [`export`]: GeoJSON and JSON writers
//! - [`pipeline`]: Orchestration, errors and logging
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │    │   Source    │    │  Normalize  │
//! │             │    │             │    │             │
//! │ Config      │───►│ Shapefile   │───►│ Geometry    │
//! │ RoomRecord  │    │ Reader      │    │ Fields      │
//! │ Values      │    │ .prj CRS    │    │ Access      │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!                                              │
//!                                              ▼
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Pipeline   │    │   Export    │    │ Validation  │
//! │             │    │             │    │             │
//! │ Processor   │───►│ GeoJSON     │◄───┤ Counts      │
//! │ Errors      │    │ JSON        │    │ Area Stats  │
//! │ Logging     │    │ Report      │    │ Thresholds  │
//! └─────────────┘    └─────────────┘    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod export;
pub mod normalize;
pub mod pipeline;
pub mod source;
pub mod types;
pub mod validation;

// Core types
pub use types::{
    AttributeValue,
    CliArgs,
    ConfigError,
    ConfigValidationError,
    // Configuration
    ProcessingConfig,
    // Records
    RoomId,
    RoomRecord,
};

// Input
pub use source::{read_shapefile, Dataset, DatasetSummary, SourceFeature};

// Normalization
pub use normalize::{FeatureOutcome, RoomNormalizer, SkipReason};

// Validation
pub use validation::{AreaStats, ValidationReport};

// Pipeline
pub use pipeline::{
    LogFormat, LoggingConfig, ProcessingError, ProcessingResult, ProcessingSummary,
    ShapefileProcessor,
};
