//! Output writers
//!
//! Three files come out of a run, each written to its own configurable
//! directory:
//!
//! - [`GEOJSON_FILE_NAME`]: a GeoJSON feature collection, one feature per room
//! - [`JSON_FILE_NAME`]: the room records as a JSON array
//! - [`VALIDATION_FILE_NAME`]: the validation report
//!
//! Identical inputs produce byte-identical files.

pub mod collection;
pub mod json;

pub use collection::{record_to_feature, records_to_feature_collection};
pub use json::write_pretty_json;

use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::pipeline::{ProcessingError, ProcessingResult};
use crate::types::RoomRecord;
use crate::validation::ValidationReport;

/// File name of the GeoJSON export
pub const GEOJSON_FILE_NAME: &str = "processed_rooms.geojson";
/// File name of the JSON records export
pub const JSON_FILE_NAME: &str = "processed_rooms.json";
/// File name of the validation report
pub const VALIDATION_FILE_NAME: &str = "validation_results.json";

/// Write rooms as a GeoJSON feature collection
#[instrument(skip(records), fields(rooms = records.len()))]
pub fn write_geojson(records: &[RoomRecord], dir: &Path) -> ProcessingResult<PathBuf> {
    let collection = records_to_feature_collection(records)?;
    let path = write_pretty_json(dir, GEOJSON_FILE_NAME, &collection)?;
    info!("Exported {} rooms to {}", records.len(), path.display());
    Ok(path)
}

/// Write rooms as a JSON array of records
#[instrument(skip(records), fields(rooms = records.len()))]
pub fn write_records_json(records: &[RoomRecord], dir: &Path) -> ProcessingResult<PathBuf> {
    if records.is_empty() {
        return Err(ProcessingError::NoRecords("export"));
    }
    let path = write_pretty_json(dir, JSON_FILE_NAME, records)?;
    info!("Exported {} rooms to {}", records.len(), path.display());
    Ok(path)
}

/// Write the validation report
#[instrument(skip(report))]
pub fn write_validation_report(report: &ValidationReport, dir: &Path) -> ProcessingResult<PathBuf> {
    let path = write_pretty_json(dir, VALIDATION_FILE_NAME, report)?;
    info!("Validation results saved to {}", path.display());
    Ok(path)
}
