//! Provider types and traits

use std::fmt;
use std::future::Future;

/// Errors that can occur while fetching a tile from its source.
///
/// These never abort a pipeline run: the fetcher substitutes a
/// placeholder tile and counts the failure.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// HTTP request failed (network, timeout, non-2xx status)
    HttpError(String),
    /// Response body was not a decodable image
    InvalidResponse(String),
    /// Tile address outside the grid at this zoom
    UnsupportedCoordinates { x: u32, y: u32, zoom: u8 },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            SourceError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            SourceError::UnsupportedCoordinates { x, y, zoom } => {
                write!(
                    f,
                    "Tile ({}, {}) at zoom {} outside the tile grid",
                    x, y, zoom
                )
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// Trait for raster tile sources.
///
/// Implementors return the raw encoded image bytes for a slippy-map
/// tile address. The pipeline decodes and, where needed, resamples.
pub trait TileSource: Send + Sync {
    /// Fetches the encoded image for one tile.
    ///
    /// # Arguments
    ///
    /// * `x` - Tile column (0 to 2^zoom - 1, west to east)
    /// * `y` - Tile row (0 to 2^zoom - 1, north to south)
    /// * `zoom` - Zoom level
    fn fetch(
        &self,
        x: u32,
        y: u32,
        zoom: u8,
    ) -> impl Future<Output = Result<Vec<u8>, SourceError>> + Send;

    /// Returns the source's name for logging and identification.
    fn name(&self) -> &str;
}
