//! HydroTrace - Water body detection over slippy-map tile mosaics
//!
//! This library stitches web map tiles covering a polygonal region into
//! a mosaic, detects water-colored areas in it, maps them back to
//! geographic polygons, filters them to the region boundary, and
//! produces a masked raster plus an analysis record.
//!
//! # High-Level API
//!
//! Most callers run the whole sequence through the [`pipeline`] module:
//!
//! ```ignore
//! use hydrotrace::pipeline::{self, PipelineConfig};
//! use hydrotrace::provider::{AsyncReqwestClient, SlippyTileSource};
//! use hydrotrace::region::region_from_geojson_str;
//!
//! let region = region_from_geojson_str(&geojson_text)?;
//! let http_client = AsyncReqwestClient::new()?;
//! let source = SlippyTileSource::openstreetmap(http_client);
//! let output = pipeline::run(&region, &source, &PipelineConfig::default()).await?;
//! ```

pub mod analysis;
pub mod coord;
pub mod detect;
pub mod fetch;
pub mod filter;
pub mod mask;
pub mod mosaic;
pub mod output;
pub mod pipeline;
pub mod provider;
pub mod region;

/// Version of the HydroTrace library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
