//! Pipeline orchestration
//!
//! [`ShapefileProcessor`] drives a run: read the dataset, normalize every
//! feature, validate the accepted rooms and export them. It owns the
//! accumulated rooms for the lifetime of the run.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::export;
use crate::normalize::{FeatureOutcome, RoomNormalizer, SkipReason};
use crate::pipeline::{ProcessingError, ProcessingResult};
use crate::source::{read_shapefile, DatasetSummary, SourceFeature};
use crate::types::{ProcessingConfig, RoomRecord};
use crate::validation::ValidationReport;

/// Outcome counts for one processing pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
    /// Features read from the dataset
    pub total_features: usize,
    /// Features that became rooms
    pub processed: usize,
    /// Features without usable geometry
    pub skipped_empty: usize,
    /// Features whose invalid geometry could not be repaired
    pub skipped_invalid: usize,
    /// Features below the minimum room area
    pub skipped_small: usize,
    /// Features that failed to normalize
    pub failed: usize,
}

impl ProcessingSummary {
    /// Features that were skipped for any reason
    pub fn skipped(&self) -> usize {
        self.skipped_empty + self.skipped_invalid + self.skipped_small
    }

    /// Share of features that became rooms, in percent
    pub fn acceptance_percentage(&self) -> f64 {
        if self.total_features == 0 {
            0.0
        } else {
            (self.processed as f64 / self.total_features as f64) * 100.0
        }
    }

    fn record_skip(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::EmptyGeometry => self.skipped_empty += 1,
            SkipReason::UnrepairableGeometry => self.skipped_invalid += 1,
            SkipReason::BelowMinimumArea { .. } => self.skipped_small += 1,
        }
    }
}

impl fmt::Display for ProcessingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} features processed ({:.1}%), skipped: {} empty, {} invalid, {} below minimum area; {} failed",
            self.processed,
            self.total_features,
            self.acceptance_percentage(),
            self.skipped_empty,
            self.skipped_invalid,
            self.skipped_small,
            self.failed
        )
    }
}

/// Runs the room processing pipeline
#[derive(Debug)]
pub struct ShapefileProcessor {
    /// Loaded configuration
    config: ProcessingConfig,
    /// Per-feature normalizer built from `config.processing`
    normalizer: RoomNormalizer,
    /// Rooms accepted by the last processing pass
    processed_rooms: Vec<RoomRecord>,
    /// Outcome counts of the last processing pass
    summary: ProcessingSummary,
    /// Summary of the last dataset read
    dataset_summary: Option<DatasetSummary>,
}

impl ShapefileProcessor {
    /// Create a processor from a validated configuration
    pub fn new(config: ProcessingConfig) -> ProcessingResult<Self> {
        config
            .validate()
            .map_err(|e| ProcessingError::Config(e.into()))?;

        Ok(Self {
            normalizer: RoomNormalizer::new(&config.processing),
            config,
            processed_rooms: Vec::new(),
            summary: ProcessingSummary::default(),
            dataset_summary: None,
        })
    }

    /// Rooms accepted by the last processing pass
    pub fn processed_rooms(&self) -> &[RoomRecord] {
        &self.processed_rooms
    }

    /// Outcome counts of the last processing pass
    pub fn summary(&self) -> &ProcessingSummary {
        &self.summary
    }

    /// Summary of the last dataset read, if any
    pub fn dataset_summary(&self) -> Option<&DatasetSummary> {
        self.dataset_summary.as_ref()
    }

    /// Read the building rooms dataset and normalize every feature
    ///
    /// `input_dir` replaces `input.shapefiles_dir` when given. A missing or
    /// unreadable dataset is fatal; failures of single features are not.
    #[instrument(skip(self))]
    pub fn process_building_rooms(
        &mut self,
        input_dir: Option<&Path>,
    ) -> ProcessingResult<&[RoomRecord]> {
        let path = self.config.input.building_rooms_path(input_dir);
        info!("Processing building rooms from {}", path.display());

        let dataset = read_shapefile(&path)?;
        self.dataset_summary = Some(dataset.summary);
        Ok(self.process_features(dataset.features))
    }

    /// Normalize features, replacing the rooms of any previous pass
    pub fn process_features(&mut self, features: Vec<SourceFeature>) -> &[RoomRecord] {
        let total = features.len();
        let interval = self.config.processing.progress_interval.max(1);

        self.processed_rooms = Vec::with_capacity(total);
        self.summary = ProcessingSummary { total_features: total, ..Default::default() };

        for (position, feature) in features.iter().enumerate() {
            match self.normalizer.normalize(feature) {
                Ok(FeatureOutcome::Accepted(record)) => {
                    self.summary.processed += 1;
                    self.processed_rooms.push(*record);
                }
                Ok(FeatureOutcome::Skipped(reason)) => self.summary.record_skip(&reason),
                Err(source) => {
                    self.summary.failed += 1;
                    warn!("{}", ProcessingError::feature_error(feature.index, source));
                }
            }

            let done = position + 1;
            if done % interval == 0 || done == total {
                info!(
                    "Processing rooms: {}/{} ({:.0}%)",
                    done,
                    total,
                    (done as f64 / total as f64) * 100.0
                );
            }
        }

        info!("Successfully processed {} rooms", self.processed_rooms.len());
        info!("{}", self.summary);
        &self.processed_rooms
    }

    /// Build and log the validation report for the processed rooms
    #[instrument(skip(self))]
    pub fn validate_processed_data(&self) -> ProcessingResult<ValidationReport> {
        let report = ValidationReport::from_records(
            &self.processed_rooms,
            &self.config.validation.data_quality_thresholds,
        )?;
        report.log_summary();
        Ok(report)
    }

    /// Write the validation report to `output_dir` or `output.validation_dir`
    pub fn export_validation_report(
        &self,
        report: &ValidationReport,
        output_dir: Option<&Path>,
    ) -> ProcessingResult<PathBuf> {
        let dir = output_dir.unwrap_or(self.config.output.validation_dir.as_path());
        export::write_validation_report(report, dir)
    }

    /// Write the rooms as GeoJSON to `output_dir` or `output.geojson_dir`
    pub fn export_to_geojson(&self, output_dir: Option<&Path>) -> ProcessingResult<PathBuf> {
        let dir = output_dir.unwrap_or(self.config.output.geojson_dir.as_path());
        export::write_geojson(&self.processed_rooms, dir)
    }

    /// Write the rooms as JSON to `output_dir` or `output.processed_dir`
    pub fn export_to_json(&self, output_dir: Option<&Path>) -> ProcessingResult<PathBuf> {
        let dir = output_dir.unwrap_or(self.config.output.processed_dir.as_path());
        export::write_records_json(&self.processed_rooms, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{polygon, Geometry};
    use std::collections::BTreeMap;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn square(side: f64) -> Option<Geometry<f64>> {
        Some(
            polygon![
                (x: 0.0, y: 0.0),
                (x: side, y: 0.0),
                (x: side, y: side),
                (x: 0.0, y: side),
            ]
            .into(),
        )
    }

    #[test]
    fn test_summary_counts_every_outcome() {
        let mut processor = ShapefileProcessor::new(ProcessingConfig::default()).unwrap();
        let point: Geometry<f64> = geo_types::point!(x: 0.0, y: 0.0).into();

        let features = vec![
            SourceFeature::new(0, square(10.0), BTreeMap::new()),
            SourceFeature::new(1, None, BTreeMap::new()),
            SourceFeature::new(2, square(0.5), BTreeMap::new()),
            SourceFeature::new(3, Some(point), BTreeMap::new()),
        ];

        let rooms = processor.process_features(features);
        assert_eq!(rooms.len(), 1);

        let summary = processor.summary();
        assert_eq!(summary.total_features, 4);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.skipped_empty, 1);
        assert_eq!(summary.skipped_small, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped(), 2);
        assert_eq!(summary.acceptance_percentage(), 25.0);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_feature_failures_are_warnings() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::INFO)
            .finish();

        let point: Geometry<f64> = geo_types::point!(x: 0.0, y: 0.0).into();
        tracing::subscriber::with_default(subscriber, || {
            let mut processor = ShapefileProcessor::new(ProcessingConfig::default()).unwrap();
            processor.process_features(vec![
                SourceFeature::new(0, square(10.0), BTreeMap::new()),
                SourceFeature::new(1, Some(point), BTreeMap::new()),
            ]);
            assert_eq!(processor.summary().failed, 1);
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let failure = output
            .lines()
            .find(|line| line.contains("Failed to process room at index 1"))
            .expect("feature failure was not logged");
        assert!(failure.contains("WARN"));
        assert!(!output.contains("ERROR"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ProcessingConfig::default();
        config.processing.progress_interval = 0;
        assert!(matches!(
            ShapefileProcessor::new(config),
            Err(ProcessingError::Config(_))
        ));
    }

    #[test]
    fn test_empty_pass_cannot_be_validated() {
        let mut processor = ShapefileProcessor::new(ProcessingConfig::default()).unwrap();
        processor.process_features(Vec::new());
        assert!(processor.processed_rooms().is_empty());
        assert!(matches!(
            processor.validate_processed_data(),
            Err(ProcessingError::NoRecords("validate"))
        ));
        assert!(matches!(processor.export_to_json(None), Err(ProcessingError::NoRecords("export"))));
    }
}
