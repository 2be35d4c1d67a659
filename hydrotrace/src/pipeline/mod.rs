//! End-to-end pipeline orchestration.
//!
//! Runs the full sequence for one region: tile bounds, parallel fetch,
//! mosaic assembly, water detection, containment filtering, region
//! masking, crop, and analysis aggregation. Each stage hands an owned
//! artifact to the next; nothing is shared mutably across stages.

use crate::analysis::{self, AnalysisRecord};
use crate::coord::CoordError;
use crate::detect::{self, DetectedPolygon, DetectorConfig};
use crate::fetch;
use crate::filter;
use crate::mask;
use crate::mosaic::{self, Mosaic};
use crate::provider::TileSource;
use crate::region::{Region, RegionError};
use image::RgbaImage;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that abort a pipeline run.
///
/// Tile-level failures are not here: a failed tile degrades to a
/// placeholder and is reported in [`PipelineOutput::failed_tiles`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("region error: {0}")]
    Region(#[from] RegionError),
    #[error("coordinate error: {0}")]
    Coord(#[from] CoordError),
}

/// Tunable parameters for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Slippy-map zoom level for fetching and detection
    pub zoom: u8,
    /// Water detection parameters
    pub detector: DetectorConfig,
    /// Padding around the region bbox as a fraction of its span
    pub padding_fraction: f64,
    /// Padding floor in degrees, so tiny regions still get context
    pub min_padding_deg: f64,
    /// Maximum in-flight tile requests
    pub max_concurrent: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            zoom: 15,
            detector: DetectorConfig::default(),
            padding_fraction: 0.5,
            min_padding_deg: 0.005,
            max_concurrent: 8,
        }
    }
}

impl PipelineConfig {
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_detector(mut self, detector: DetectorConfig) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_padding(mut self, fraction: f64, min_deg: f64) -> Self {
        self.padding_fraction = fraction;
        self.min_padding_deg = min_deg;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }
}

/// Everything a pipeline run produces.
pub struct PipelineOutput {
    /// Masked raster cropped to the region's occupied extent
    pub raster: RgbaImage,
    /// Crop window `(min_x, min_y, max_x, max_y)` within the mosaic, or
    /// `None` when the mask was empty and no crop happened
    pub mask_extent: Option<(u32, u32, u32, u32)>,
    /// Detected water polygons inside the region
    pub polygons: Vec<DetectedPolygon>,
    /// Aggregate analysis record
    pub analysis: AnalysisRecord,
    /// Tiles that degraded to placeholders during fetch
    pub failed_tiles: usize,
}

/// Runs the full pipeline for one region.
pub async fn run<S: TileSource>(
    region: &Region,
    source: &S,
    config: &PipelineConfig,
) -> Result<PipelineOutput, PipelineError> {
    info!(
        region = %region.name,
        zoom = config.zoom,
        source = source.name(),
        "starting pipeline run"
    );

    let bounds = mosaic::tile_bounds(
        &region.boundary,
        config.zoom,
        config.padding_fraction,
        config.min_padding_deg,
    )?;

    if bounds.tile_count() < 4 {
        warn!(
            tiles = bounds.tile_count(),
            "mosaic covers very few tiles; detection may lack context"
        );
    }

    let report = fetch::fetch_tiles(source, &bounds, config.max_concurrent).await;
    let mosaic = Mosaic::assemble(&report.tiles, &bounds);

    let candidates = detect::detect(&mosaic, &config.detector);
    let polygons = filter::filter_within(candidates, &region.boundary);

    let region_mask = mask::rasterize_region(&region.boundary, &mosaic)?;
    let mask_extent = mask::mask_extent(&region_mask);
    let raster = mask::apply_and_crop(&mosaic, &region_mask);

    let analysis = analysis::summarize(&polygons, &region.boundary, &region.name);

    info!(
        region = %region.name,
        polygons = polygons.len(),
        failed_tiles = report.failed,
        raster_width = raster.width(),
        raster_height = raster.height(),
        "pipeline run complete"
    );

    Ok(PipelineOutput {
        raster,
        mask_extent,
        polygons,
        analysis,
        failed_tiles: report.failed,
    })
}
