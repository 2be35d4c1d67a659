//! Parallel tile fetching with graceful degradation.
//!
//! Downloads every tile in a [`TileBounds`] through a [`TileSource`]
//! with a bounded number of in-flight requests. A tile that fails to
//! fetch or decode is replaced by a uniform light-gray placeholder and
//! counted; it never aborts the run. The mosaic then simply shows a
//! gray block where data was missing.

use crate::coord::{TileCoord, TILE_SIZE};
use crate::mosaic::TileBounds;
use crate::provider::{SourceError, TileSource};
use futures::stream::{self, StreamExt};
use image::{ImageReader, Rgba, RgbaImage};
use std::collections::HashMap;
use std::io::Cursor;
use tracing::{debug, info, warn};

/// Placeholder fill color for failed tiles ("light gray").
const PLACEHOLDER_RGBA: [u8; 4] = [211, 211, 211, 255];

/// Result of fetching a tile set: the decoded rasters keyed by tile
/// address, plus the number of tiles that degraded to placeholders.
pub struct FetchReport {
    pub tiles: HashMap<(u32, u32), RgbaImage>,
    pub failed: usize,
}

/// Creates the uniform placeholder raster substituted for failed tiles.
pub fn placeholder_tile() -> RgbaImage {
    RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgba(PLACEHOLDER_RGBA))
}

/// Decodes fetched tile bytes into an RGBA raster.
fn decode_tile(bytes: Vec<u8>) -> Result<RgbaImage, SourceError> {
    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| SourceError::InvalidResponse(format!("unrecognised image format: {}", e)))?
        .decode()
        .map_err(|e| SourceError::InvalidResponse(format!("image decode failed: {}", e)))?;
    Ok(image.to_rgba8())
}

/// Fetches and decodes every tile in `bounds`.
///
/// At most `max_concurrent` requests are in flight at once. The call
/// blocks until every tile has resolved to either a decoded raster or a
/// placeholder.
pub async fn fetch_tiles<S: TileSource>(
    source: &S,
    bounds: &TileBounds,
    max_concurrent: usize,
) -> FetchReport {
    let coords: Vec<TileCoord> = bounds.tiles().collect();
    info!(
        tiles = coords.len(),
        max_concurrent,
        source = source.name(),
        "fetching tiles"
    );

    let results: Vec<(TileCoord, Result<RgbaImage, SourceError>)> =
        stream::iter(coords.into_iter().map(|tile| async move {
            let outcome = match source.fetch(tile.x, tile.y, tile.zoom).await {
                Ok(bytes) => decode_tile(bytes),
                Err(e) => Err(e),
            };
            (tile, outcome)
        }))
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    let mut tiles = HashMap::with_capacity(results.len());
    let mut failed = 0usize;

    for (tile, outcome) in results {
        match outcome {
            Ok(raster) => {
                debug!(tile = %tile, "tile fetched");
                tiles.insert((tile.x, tile.y), raster);
            }
            Err(e) => {
                warn!(tile = %tile, error = %e, "tile failed, substituting placeholder");
                tiles.insert((tile.x, tile.y), placeholder_tile());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        warn!(failed, "some tiles degraded to placeholders");
    }

    FetchReport { tiles, failed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    struct FixedSource {
        response: Result<Vec<u8>, SourceError>,
    }

    impl TileSource for FixedSource {
        async fn fetch(&self, _x: u32, _y: u32, _zoom: u8) -> Result<Vec<u8>, SourceError> {
            self.response.clone()
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn png_bytes(rgba: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgba(rgba));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn two_by_two() -> TileBounds {
        TileBounds {
            min_x: 4,
            min_y: 8,
            max_x: 5,
            max_y: 9,
            zoom: 5,
        }
    }

    #[tokio::test]
    async fn test_all_tiles_fetched() {
        let source = FixedSource {
            response: Ok(png_bytes([0, 0, 255, 255])),
        };

        let report = fetch_tiles(&source, &two_by_two(), 4).await;
        assert_eq!(report.tiles.len(), 4);
        assert_eq!(report.failed, 0);

        let tile = report.tiles.get(&(4, 8)).unwrap();
        assert_eq!(*tile.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }

    #[tokio::test]
    async fn test_fetch_failure_substitutes_placeholder() {
        let source = FixedSource {
            response: Err(SourceError::HttpError("503".to_string())),
        };

        let report = fetch_tiles(&source, &two_by_two(), 2).await;
        assert_eq!(report.tiles.len(), 4);
        assert_eq!(report.failed, 4);

        let tile = report.tiles.get(&(5, 9)).unwrap();
        assert_eq!(*tile.get_pixel(10, 10), Rgba(PLACEHOLDER_RGBA));
    }

    #[tokio::test]
    async fn test_undecodable_body_substitutes_placeholder() {
        let source = FixedSource {
            response: Ok(vec![0xde, 0xad, 0xbe, 0xef]),
        };

        let report = fetch_tiles(&source, &two_by_two(), 2).await;
        assert_eq!(report.failed, 4);
    }

    #[tokio::test]
    async fn test_zero_concurrency_clamped_to_one() {
        let source = FixedSource {
            response: Ok(png_bytes([1, 2, 3, 255])),
        };

        let report = fetch_tiles(&source, &two_by_two(), 0).await;
        assert_eq!(report.tiles.len(), 4);
    }

    #[test]
    fn test_placeholder_is_canonical_size() {
        let tile = placeholder_tile();
        assert_eq!(tile.width(), TILE_SIZE);
        assert_eq!(tile.height(), TILE_SIZE);
    }
}
