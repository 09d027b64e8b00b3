//! Configuration structures for the shapefile room processor
//!
//! This module contains the command line arguments, the YAML processing
//! configuration with `${VAR}` / `${VAR:default}` interpolation, and the
//! validation logic applied before a run starts.

use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Default location of the processing configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/processing_config.yaml";

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "process-shapefiles",
    version,
    about = "Process building shapefiles into normalized room records",
    long_about = "Reads the building rooms shapefile named in the configuration, normalizes every room feature (geometry repair, area filter, field-name reconciliation, accessibility) and optionally writes validation statistics, GeoJSON and JSON exports.

EXAMPLES:
    # Process and export everything
    process-shapefiles --validate --export-geojson --export-json

    # Use another configuration and write all outputs to one directory
    process-shapefiles -c config/campus.yaml -o out/ --export-json

CONFIGURATION:
    Configuration is read from a YAML file. String values may embed ${VAR} or
    ${VAR:default} tokens which are resolved from the environment at load time."
)]
pub struct CliArgs {
    /// Configuration file path (YAML format)
    #[arg(
        short,
        long,
        default_value = DEFAULT_CONFIG_PATH,
        help = "Configuration file path"
    )]
    pub config: PathBuf,

    /// Input directory containing shapefiles
    #[arg(short, long, help = "Input directory containing shapefiles")]
    pub input: Option<PathBuf>,

    /// Output directory for processed data
    #[arg(
        short,
        long,
        help = "Output directory for processed data",
        long_help = "Output directory for processed data. Overrides every configured output directory (GeoJSON, JSON and validation report)."
    )]
    pub output: Option<PathBuf>,

    /// Run validation after processing
    #[arg(long, help = "Run validation after processing")]
    pub validate: bool,

    /// Export to GeoJSON format
    #[arg(long, help = "Export to GeoJSON format")]
    pub export_geojson: bool,

    /// Export to JSON format
    #[arg(long, help = "Export to JSON format")]
    pub export_json: bool,
}

/// `logging` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level name (TRACE, DEBUG, INFO, WARN/WARNING, ERROR/CRITICAL)
    pub level: String,
    /// Console format: `json`, `pretty`, `compact`, anything else is plain text
    pub format: Option<String>,
    /// Optional log file path
    pub file: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: "INFO".to_string(), format: None, file: None }
    }
}

impl LoggingSection {
    /// Resolve the configured level name into a tracing level
    pub fn tracing_level(&self) -> Result<Level, ConfigValidationError> {
        match self.level.trim().to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" | "success" => Ok(Level::INFO),
            "warn" | "warning" => Ok(Level::WARN),
            "error" | "critical" => Ok(Level::ERROR),
            _ => Err(ConfigValidationError::InvalidLogLevel(self.level.clone())),
        }
    }
}

/// `input` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// Directory holding the shapefiles
    pub shapefiles_dir: PathBuf,
    /// Dataset stem of the building rooms shapefile (`.shp` is appended)
    pub building_rooms_file: String,
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            shapefiles_dir: PathBuf::from("data/shapefiles"),
            building_rooms_file: "BuildingTRooms".to_string(),
        }
    }
}

impl InputSection {
    /// Path of the building rooms shapefile, optionally under another directory
    pub fn building_rooms_path(&self, input_dir: Option<&Path>) -> PathBuf {
        let dir = input_dir.unwrap_or(self.shapefiles_dir.as_path());
        dir.join(format!("{}.shp", self.building_rooms_file))
    }
}

/// `processing` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSection {
    /// Rooms with a smaller planar area are dropped
    pub min_room_area: f64,
    /// Building identifier used when a feature has none
    pub default_building_id: String,
    /// Floor level used when a feature has none
    pub default_floor_level: i64,
    /// Number of features between progress log lines
    pub progress_interval: usize,
}

impl Default for ProcessingSection {
    fn default() -> Self {
        Self {
            min_room_area: 1.0,
            default_building_id: "T".to_string(),
            default_floor_level: 1,
            progress_interval: 100,
        }
    }
}

/// `output` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Directory for `processed_rooms.geojson`
    pub geojson_dir: PathBuf,
    /// Directory for `processed_rooms.json`
    pub processed_dir: PathBuf,
    /// Directory for `validation_results.json`
    pub validation_dir: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            geojson_dir: PathBuf::from("data/geojson"),
            processed_dir: PathBuf::from("data/processed"),
            validation_dir: PathBuf::from("data/validation"),
        }
    }
}

/// `validation.data_quality_thresholds` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataQualityThresholds {
    /// Buildings with fewer rooms are reported as validation errors
    pub min_rooms_per_building: usize,
}

impl Default for DataQualityThresholds {
    fn default() -> Self {
        Self { min_rooms_per_building: 1 }
    }
}

/// `validation` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSection {
    /// Thresholds applied to the aggregated statistics
    pub data_quality_thresholds: DataQualityThresholds,
}

/// Complete processing configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Logging settings
    pub logging: LoggingSection,
    /// Input dataset location
    pub input: InputSection,
    /// Per-feature processing settings
    pub processing: ProcessingSection,
    /// Output directories
    pub output: OutputSection,
    /// Validation thresholds
    pub validation: ValidationSection,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ConfigValidationError),
}

/// Validation errors for the processing configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    /// Minimum room area is negative or not a number
    #[error("min_room_area must be a finite value >= 0, got {0}")]
    InvalidMinRoomArea(f64),

    /// Dataset name is empty
    #[error("input.building_rooms_file must not be empty")]
    EmptyDatasetName,

    /// Progress interval is zero
    #[error("processing.progress_interval must be greater than 0")]
    InvalidProgressInterval,

    /// Log level is not recognized
    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),
}

impl ProcessingConfig {
    /// Load configuration from a YAML file, resolving environment tokens
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text using the process environment
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Self::from_yaml_str_with(content, |name| std::env::var(name).ok())
    }

    /// Parse configuration from YAML text with a custom variable lookup
    pub fn from_yaml_str_with<F>(content: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw: Value = serde_yaml::from_str(content)?;
        let raw = match raw {
            Value::Null => Value::Mapping(Mapping::new()),
            other => other,
        };
        let expanded = expand_env_vars_with(raw, &lookup);
        Ok(serde_yaml::from_value(expanded)?)
    }

    /// Render the configuration as YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let min_area = self.processing.min_room_area;
        if !min_area.is_finite() || min_area < 0.0 {
            return Err(ConfigValidationError::InvalidMinRoomArea(min_area));
        }

        if self.input.building_rooms_file.trim().is_empty() {
            return Err(ConfigValidationError::EmptyDatasetName);
        }

        if self.processing.progress_interval == 0 {
            return Err(ConfigValidationError::InvalidProgressInterval);
        }

        self.logging.tracing_level()?;

        Ok(())
    }
}

/// Recursively expand `${VAR}` tokens with a custom variable lookup
///
/// Only string scalars are rewritten; mapping keys are left alone. A string
/// that is exactly one token is re-read as a YAML scalar afterwards, so numbers
/// and booleans coming from the environment keep their type.
pub fn expand_env_vars_with<F>(value: Value, lookup: &F) -> Value
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| (key, expand_env_vars_with(value, lookup)))
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(
            items.into_iter().map(|item| expand_env_vars_with(item, lookup)).collect(),
        ),
        Value::String(text) => {
            let expanded = interpolate(&text, lookup);
            if is_single_token(&text) {
                retype_scalar(expanded)
            } else {
                Value::String(expanded)
            }
        }
        other => other,
    }
}

/// Substitute every `${VAR}` / `${VAR:default}` token in `input`
///
/// Unset variables without a default resolve to the empty string. An
/// unterminated `${` is kept verbatim.
pub fn interpolate<F>(input: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find('}') else {
            output.push_str(&rest[start..]);
            return output;
        };

        let expression = &after_open[..end];
        let (name, default) = match expression.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (expression, None),
        };

        if name.is_empty() {
            output.push_str(&rest[start..start + 2 + end + 1]);
        } else {
            let resolved = lookup(name).or_else(|| default.map(str::to_string)).unwrap_or_default();
            output.push_str(&resolved);
        }

        rest = &after_open[end + 1..];
    }

    output.push_str(rest);
    output
}

fn is_single_token(text: &str) -> bool {
    text.len() >= 3
        && text.starts_with("${")
        && text.ends_with('}')
        && text[2..].find('}') == Some(text.len() - 3)
}

fn retype_scalar(text: String) -> Value {
    if text.is_empty() {
        return Value::String(text);
    }
    match serde_yaml::from_str::<Value>(&text) {
        Ok(value @ (Value::Bool(_) | Value::Number(_))) => value,
        _ => Value::String(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_processing_config_default() {
        let config = ProcessingConfig::default();

        assert_eq!(config.logging.level, "INFO");
        assert_eq!(config.input.shapefiles_dir, PathBuf::from("data/shapefiles"));
        assert_eq!(config.input.building_rooms_file, "BuildingTRooms");
        assert_eq!(config.processing.min_room_area, 1.0);
        assert_eq!(config.processing.default_building_id, "T");
        assert_eq!(config.processing.default_floor_level, 1);
        assert_eq!(config.validation.data_quality_thresholds.min_rooms_per_building, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_interpolate_with_and_without_defaults() {
        let lookup = lookup_from(&[("DATA_ROOT", "/srv/data")]);

        assert_eq!(interpolate("${DATA_ROOT}/shp", &lookup), "/srv/data/shp");
        assert_eq!(interpolate("${MISSING:fallback}", &lookup), "fallback");
        assert_eq!(interpolate("${MISSING}", &lookup), "");
        assert_eq!(interpolate("${DATA_ROOT:ignored}", &lookup), "/srv/data");
        assert_eq!(interpolate("a-${MISSING:x}-${DATA_ROOT}-b", &lookup), "a-x-/srv/data-b");
    }

    #[test]
    fn test_interpolate_keeps_malformed_tokens() {
        let lookup = lookup_from(&[]);

        assert_eq!(interpolate("${UNTERMINATED", &lookup), "${UNTERMINATED");
        assert_eq!(interpolate("cost ${}", &lookup), "cost ${}");
        assert_eq!(interpolate("plain text", &lookup), "plain text");
    }

    #[test]
    fn test_default_may_contain_colons() {
        let lookup = lookup_from(&[]);
        assert_eq!(interpolate("${URL:http://localhost:8080}", &lookup), "http://localhost:8080");
    }

    #[test]
    fn test_single_token_is_retyped() {
        let lookup = lookup_from(&[("MIN_AREA", "2.5")]);
        let yaml = "processing:\n  min_room_area: ${MIN_AREA}\n";

        let config = ProcessingConfig::from_yaml_str_with(yaml, lookup).unwrap();
        assert_eq!(config.processing.min_room_area, 2.5);
    }

    #[test]
    fn test_nested_sections_are_expanded() {
        let lookup = lookup_from(&[("OUT", "/tmp/out"), ("LEVEL", "DEBUG")]);
        let yaml = r#"
logging:
  level: ${LEVEL:INFO}
input:
  shapefiles_dir: ${SHP_DIR:data/shp}
  building_rooms_file: BuildingTRooms
processing:
  min_room_area: ${MIN_AREA:4}
output:
  geojson_dir: ${OUT}/geojson
  processed_dir: ${OUT}/processed
  validation_dir: ${OUT}/validation
validation:
  data_quality_thresholds:
    min_rooms_per_building: ${MIN_ROOMS:3}
"#;

        let config = ProcessingConfig::from_yaml_str_with(yaml, lookup).unwrap();

        assert_eq!(config.logging.level, "DEBUG");
        assert_eq!(config.input.shapefiles_dir, PathBuf::from("data/shp"));
        assert_eq!(config.processing.min_room_area, 4.0);
        assert_eq!(config.output.geojson_dir, PathBuf::from("/tmp/out/geojson"));
        assert_eq!(config.output.validation_dir, PathBuf::from("/tmp/out/validation"));
        assert_eq!(config.validation.data_quality_thresholds.min_rooms_per_building, 3);
    }

    #[test]
    fn test_sequences_are_expanded() {
        let lookup = lookup_from(&[("A", "x")]);
        let value: Value = serde_yaml::from_str("[\"${A}\", \"${B:y}\", 3]").unwrap();

        let expanded = expand_env_vars_with(value, &lookup);
        let expected: Value = serde_yaml::from_str("[x, y, 3]").unwrap();
        assert_eq!(expanded, expected);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ProcessingConfig::from_yaml_str_with("", lookup_from(&[])).unwrap();
        assert_eq!(config, ProcessingConfig::default());
    }

    #[test]
    fn test_missing_file_is_reported() {
        match ProcessingConfig::from_file("does/not/exist.yaml") {
            Err(ConfigError::FileNotFound(path)) => assert!(path.contains("exist.yaml")),
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_rejects_negative_area() {
        let mut config = ProcessingConfig::default();
        config.processing.min_room_area = -1.0;

        match config.validate() {
            Err(ConfigValidationError::InvalidMinRoomArea(value)) => assert_eq!(value, -1.0),
            _ => panic!("Expected InvalidMinRoomArea error"),
        }
    }

    #[test]
    fn test_validation_rejects_empty_dataset_and_interval() {
        let mut config = ProcessingConfig::default();
        config.input.building_rooms_file = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigValidationError::EmptyDatasetName)));

        let mut config = ProcessingConfig::default();
        config.processing.progress_interval = 0;
        assert!(matches!(config.validate(), Err(ConfigValidationError::InvalidProgressInterval)));
    }

    #[test]
    fn test_log_level_names() {
        let mut section = LoggingSection::default();
        for (name, level) in [
            ("warning", Level::WARN),
            ("CRITICAL", Level::ERROR),
            ("Debug", Level::DEBUG),
            ("SUCCESS", Level::INFO),
        ] {
            section.level = name.to_string();
            assert_eq!(section.tracing_level().unwrap(), level);
        }

        section.level = "loud".to_string();
        assert!(matches!(section.tracing_level(), Err(ConfigValidationError::InvalidLogLevel(_))));
    }

    #[test]
    fn test_building_rooms_path_override() {
        let input = InputSection::default();
        assert_eq!(
            input.building_rooms_path(None),
            PathBuf::from("data/shapefiles/BuildingTRooms.shp")
        );
        assert_eq!(
            input.building_rooms_path(Some(Path::new("/mnt/shp"))),
            PathBuf::from("/mnt/shp/BuildingTRooms.shp")
        );
    }

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::try_parse_from(["test"]).unwrap();
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(args.input.is_none());
        assert!(args.output.is_none());
        assert!(!args.validate);
        assert!(!args.export_geojson);
        assert!(!args.export_json);
    }
}
