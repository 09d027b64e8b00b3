//! Validation statistics and data-quality checks
//!
//! The report tallies rooms per building, floor and type, splits them by
//! accessibility, summarizes areas, and lists soft validation errors. Soft
//! errors are reported only; they never block export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, warn};

use crate::pipeline::{ProcessingError, ProcessingResult};
use crate::types::{DataQualityThresholds, RoomRecord};

/// Accessible versus not accessible room counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilityCounts {
    /// Rooms flagged accessible
    pub accessible: usize,
    /// Rooms flagged not accessible
    pub not_accessible: usize,
}

/// Descriptive statistics over room areas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaStats {
    /// Smallest area
    pub min_area: f64,
    /// Largest area
    pub max_area: f64,
    /// Arithmetic mean
    pub mean_area: f64,
    /// Median (mean of the two middle values for even counts)
    pub median_area: f64,
    /// Sum of all areas
    pub total_area: f64,
}

impl AreaStats {
    /// Compute statistics, `None` for an empty slice
    pub fn from_areas(areas: &[f64]) -> Option<Self> {
        if areas.is_empty() {
            return None;
        }

        let mut sorted = areas.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let total_area: f64 = sorted.iter().sum();
        let median_area = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Some(Self {
            min_area: sorted[0],
            max_area: sorted[count - 1],
            mean_area: total_area / count as f64,
            median_area,
            total_area,
        })
    }
}

/// Aggregate validation results for a processed room set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Number of rooms
    pub total_rooms: usize,
    /// Rooms per building
    pub buildings: BTreeMap<String, usize>,
    /// Rooms per `<building>_F<floor>`
    pub floors: BTreeMap<String, usize>,
    /// Rooms per room type
    pub room_types: BTreeMap<String, usize>,
    /// Accessibility split
    pub accessibility: AccessibilityCounts,
    /// Area statistics
    pub area_stats: AreaStats,
    /// Room identifiers that occur more than once, with their counts
    pub duplicate_room_ids: BTreeMap<String, usize>,
    /// Soft validation errors
    pub validation_errors: Vec<String>,
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
}

impl ValidationReport {
    /// Build the report for a set of rooms
    ///
    /// An empty room set is an error: there is nothing to validate.
    pub fn from_records(
        records: &[RoomRecord],
        thresholds: &DataQualityThresholds,
    ) -> ProcessingResult<Self> {
        let areas: Vec<f64> = records.iter().map(|room| room.area_sqm).collect();
        let area_stats = AreaStats::from_areas(&areas).ok_or(ProcessingError::NoRecords("validate"))?;

        let mut buildings = BTreeMap::new();
        let mut floors = BTreeMap::new();
        let mut room_types = BTreeMap::new();
        let mut room_ids: BTreeMap<String, usize> = BTreeMap::new();
        let mut accessibility = AccessibilityCounts::default();

        for room in records {
            *buildings.entry(room.building_id.clone()).or_insert(0) += 1;
            *floors.entry(room.floor_key()).or_insert(0) += 1;
            *room_types.entry(room.room_type.clone()).or_insert(0) += 1;
            *room_ids.entry(room.room_id.to_string()).or_insert(0) += 1;

            if room.is_accessible {
                accessibility.accessible += 1;
            } else {
                accessibility.not_accessible += 1;
            }
        }

        let mut validation_errors = Vec::new();
        let minimum = thresholds.min_rooms_per_building;
        for (building_id, room_count) in &buildings {
            if *room_count < minimum {
                validation_errors.push(format!(
                    "Building {} has only {} rooms (minimum: {})",
                    building_id, room_count, minimum
                ));
            }
        }

        let duplicate_room_ids: BTreeMap<String, usize> =
            room_ids.into_iter().filter(|(_, count)| *count > 1).collect();
        for (room_id, count) in &duplicate_room_ids {
            validation_errors.push(format!("Room id {} appears {} times", room_id, count));
        }

        Ok(Self {
            total_rooms: records.len(),
            buildings,
            floors,
            room_types,
            accessibility,
            area_stats,
            duplicate_room_ids,
            validation_errors,
            generated_at: Utc::now(),
        })
    }

    /// Check whether any soft validation error was found
    pub fn has_errors(&self) -> bool {
        !self.validation_errors.is_empty()
    }

    /// Log the headline figures and every soft error
    pub fn log_summary(&self) {
        info!("Validation Results:");
        info!("  Total rooms: {}", self.total_rooms);
        info!("  Buildings: {}", self.buildings.len());
        info!("  Floors: {}", self.floors.len());
        info!("  Room types: {}", self.room_types.len());
        info!("  Accessible rooms: {}", self.accessibility.accessible);
        info!("  Average area: {:.2} sqm", self.area_stats.mean_area);

        if self.has_errors() {
            warn!("Validation errors found: {}", self.validation_errors.len());
            for error in &self.validation_errors {
                warn!("  - {}", error);
            }
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rooms in {} buildings ({} floors), {} accessible, mean area {:.2}, {} validation errors",
            self.total_rooms,
            self.buildings.len(),
            self.floors.len(),
            self.accessibility.accessible,
            self.area_stats.mean_area,
            self.validation_errors.len()
        )
    }
}
