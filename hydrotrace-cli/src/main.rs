//! HydroTrace CLI - Command-line interface
//!
//! Runs the water detection pipeline for a GeoJSON region and writes the
//! cropped raster, detected polygons, and analysis record to disk.

use clap::{Parser, ValueEnum};
use hydrotrace::detect::{DetectorConfig, DetectorKind};
use hydrotrace::pipeline::{self, PipelineConfig};
use hydrotrace::provider::{AsyncReqwestClient, SlippyTileSource, OSM_URL_TEMPLATE};
use hydrotrace::region::region_from_geojson_str;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, ValueEnum)]
enum DetectorType {
    /// HSV hue-range matching with an RGB backup range
    Hsv,
    /// RGB-only range matching
    Rgb,
}

#[derive(Parser)]
#[command(name = "hydrotrace")]
#[command(about = "Detect water bodies on map tiles covering a region", long_about = None)]
#[command(version = hydrotrace::VERSION)]
struct Args {
    /// Path to a GeoJSON file with the region boundary (Feature,
    /// FeatureCollection, or bare Polygon)
    #[arg(long)]
    region: String,

    /// Output path for the masked, cropped raster (PNG)
    #[arg(long, default_value = "region.png")]
    output: String,

    /// Output path for the detected water polygons (GeoJSON)
    #[arg(long, default_value = "water_polygons.geojson")]
    polygons_out: String,

    /// Output path for the analysis record (JSON)
    #[arg(long, default_value = "analysis.json")]
    analysis_out: String,

    /// Slippy-map zoom level (1-19)
    #[arg(long, default_value = "15")]
    zoom: u8,

    /// Tile server URL template with {z}/{x}/{y} markers
    #[arg(long, default_value = OSM_URL_TEMPLATE)]
    url_template: String,

    /// Maximum concurrent tile requests
    #[arg(long, default_value = "8")]
    max_concurrent: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,

    /// Color model used for water detection
    #[arg(long, value_enum, default_value = "hsv")]
    detector: DetectorType,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.zoom < 1 || args.zoom > 19 {
        eprintln!("Error: Zoom level must be between 1 and 19");
        process::exit(1);
    }

    let geojson_text = match fs::read_to_string(&args.region) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading region file {}: {}", args.region, e);
            process::exit(1);
        }
    };

    let region = match region_from_geojson_str(&geojson_text) {
        Ok(region) => region,
        Err(e) => {
            eprintln!("Error parsing region: {}", e);
            process::exit(1);
        }
    };

    println!("Processing region:");
    println!("  Name: {}", region.name);
    println!("  Boundary vertices: {}", region.boundary.len());
    println!("  Zoom: {}", args.zoom);
    println!();

    let http_client = match AsyncReqwestClient::with_timeout(args.timeout) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error creating HTTP client: {}", e);
            process::exit(1);
        }
    };

    let source = SlippyTileSource::new(http_client, args.url_template.clone(), "tile-server");

    let kind = match args.detector {
        DetectorType::Hsv => DetectorKind::Hsv,
        DetectorType::Rgb => DetectorKind::Rgb,
    };

    let config = PipelineConfig::default()
        .with_zoom(args.zoom)
        .with_max_concurrent(args.max_concurrent)
        .with_detector(DetectorConfig::default().with_kind(kind));

    let output = match pipeline::run(&region, &source, &config).await {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Pipeline failed: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = output.raster.save(&args.output) {
        eprintln!("Error writing raster {}: {}", args.output, e);
        process::exit(1);
    }

    let collection = hydrotrace::output::polygons_to_geojson(&output.polygons, args.zoom);
    if let Err(e) = fs::write(&args.polygons_out, collection.to_string()) {
        eprintln!("Error writing polygons {}: {}", args.polygons_out, e);
        process::exit(1);
    }

    let analysis_json = match serde_json::to_string_pretty(&output.analysis) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing analysis: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = fs::write(&args.analysis_out, analysis_json) {
        eprintln!("Error writing analysis {}: {}", args.analysis_out, e);
        process::exit(1);
    }

    println!("Done:");
    println!("  Water polygons: {}", output.polygons.len());
    if output.failed_tiles > 0 {
        println!("  Tiles degraded to placeholders: {}", output.failed_tiles);
    }
    println!("  Raster: {}", args.output);
    println!("  Polygons: {}", args.polygons_out);
    println!("  Analysis: {}", args.analysis_out);
}
