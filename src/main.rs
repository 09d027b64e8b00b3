// Shapefile Room Processor - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/process-shapefiles --validate --export-geojson --export-json
// ```
//
// Or with a custom configuration and directories:
//
// ```console
// $ ./target/release/process-shapefiles -c config/processing_config.yaml -i data/shapefiles -o out --validate
// ```

use anyhow::{bail, Context};
use clap::Parser;
use shapefile_room_processor::pipeline::{LoggingConfig, ShapefileProcessor};
use shapefile_room_processor::types::{CliArgs, ProcessingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    // Load configuration before logging so its logging section applies
    let config = match ProcessingConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation failed: {}", e);
        process::exit(1);
    }

    let logging = match LoggingConfig::from_section(&config.logging) {
        Ok(logging) => logging,
        Err(e) => {
            eprintln!("Invalid logging configuration: {}", e);
            process::exit(1);
        }
    };

    // The guard flushes the log file on drop
    let guard = match logging.init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Configuration loaded from {}", args.config.display());

    let result = run(&args, config);
    if let Err(e) = &result {
        error!("Processing failed: {:#}", e);
    }

    // process::exit skips destructors, so flush the log file first
    drop(guard);

    if result.is_err() {
        process::exit(1);
    }
}

/// Run the pipeline stages selected on the command line
fn run(args: &CliArgs, config: ProcessingConfig) -> anyhow::Result<()> {
    let mut processor =
        ShapefileProcessor::new(config).context("Failed to initialize processor")?;

    info!("Starting shapefile processing...");
    let room_count = processor
        .process_building_rooms(args.input.as_deref())
        .context("Failed to process building rooms")?
        .len();

    if room_count == 0 {
        if args.validate || args.export_geojson || args.export_json {
            bail!("No rooms were processed successfully");
        }
        error!("No rooms were processed successfully");
        return Ok(());
    }

    let output = args.output.as_deref();

    if args.validate {
        info!("Running data validation...");
        let report = processor
            .validate_processed_data()
            .context("Validation failed")?;
        processor
            .export_validation_report(&report, output)
            .context("Failed to write validation results")?;
    }

    if args.export_geojson {
        info!("Exporting to GeoJSON...");
        processor
            .export_to_geojson(output)
            .context("GeoJSON export failed")?;
    }

    if args.export_json {
        info!("Exporting to JSON...");
        processor.export_to_json(output).context("JSON export failed")?;
    }

    info!("Processing completed successfully!");
    Ok(())
}
