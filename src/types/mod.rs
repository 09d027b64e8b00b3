//! Core types for the shapefile room processor
//!
//! This module contains the configuration structures, the normalized room
//! record and the scalar attribute model shared by every pipeline stage.
//!
//! # Overview
//!
//! - **Configuration**: CLI arguments and the YAML processing configuration
//! - **Records**: [`RoomRecord`] and its derived [`RoomId`]
//! - **Values**: [`AttributeValue`], the scalar model for source attributes
//!
//! # Usage Example
//!
//! ```rust
//! use shapefile_room_processor::types::*;
//!
//! let yaml = "processing:\n  min_room_area: ${MIN_AREA:2.0}\n";
//! let config = ProcessingConfig::from_yaml_str_with(yaml, |_| None).unwrap();
//! assert_eq!(config.processing.min_room_area, 2.0);
//!
//! let id = RoomId::from_parts("T", 2, "101");
//! assert_eq!(id.to_string(), "T_2_101");
//! ```

pub mod config;
pub mod record;
pub mod value;

// Re-export all public types for convenience
pub use config::*;
pub use record::*;
pub use value::*;
