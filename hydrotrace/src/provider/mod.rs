//! Tile source abstraction
//!
//! This module provides traits and implementations for fetching raster
//! map tiles over HTTP. The [`TileSource`] trait is the seam the rest of
//! the pipeline depends on; [`SlippyTileSource`] implements it for any
//! `{z}/{x}/{y}` templated tile server.

mod http;
mod slippy;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use slippy::{SlippyTileSource, OSM_URL_TEMPLATE};
pub use types::{SourceError, TileSource};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
