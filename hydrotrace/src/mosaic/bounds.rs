//! Tile-grid bounding box for a region.

use crate::coord::{self, CoordError, TileCoord, TileOrigin, MAX_LAT, MIN_LAT, TILE_SIZE};
use crate::region::GeoPolygon;
use tracing::debug;

/// Inclusive tile-coordinate bounding box at a fixed zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    pub zoom: u8,
}

impl TileBounds {
    /// Number of tile columns.
    pub fn width_tiles(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Number of tile rows.
    pub fn height_tiles(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Mosaic width in pixels.
    pub fn width_px(&self) -> u32 {
        self.width_tiles() * TILE_SIZE
    }

    /// Mosaic height in pixels.
    pub fn height_px(&self) -> u32 {
        self.height_tiles() * TILE_SIZE
    }

    /// Total number of tiles covered.
    pub fn tile_count(&self) -> usize {
        self.width_tiles() as usize * self.height_tiles() as usize
    }

    /// The mosaic's pixel-space reference tile (north-west corner).
    pub fn origin(&self) -> TileOrigin {
        TileOrigin {
            x: self.min_x,
            y: self.min_y,
            zoom: self.zoom,
        }
    }

    /// Iterates all covered tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        let zoom = self.zoom;
        let (min_x, max_x) = (self.min_x, self.max_x);
        (self.min_y..=self.max_y)
            .flat_map(move |y| (min_x..=max_x).map(move |x| TileCoord { x, y, zoom }))
    }
}

/// Computes the tile bounding box covering a region with adaptive padding.
///
/// The region's geographic bbox is padded by
/// `max(padding_fraction * span, min_padding_deg)` per axis, then the
/// padded corners are converted to tile addresses.
///
/// # Errors
///
/// Returns [`CoordError::InvalidLatitude`] if the region itself extends
/// beyond the Web Mercator domain. Padding that crosses the domain edge
/// is clamped instead, since it carries no data.
pub fn tile_bounds(
    boundary: &GeoPolygon,
    zoom: u8,
    padding_fraction: f64,
    min_padding_deg: f64,
) -> Result<TileBounds, CoordError> {
    let bounds = boundary.bounding_box();
    if !(MIN_LAT..=MAX_LAT).contains(&bounds.min_lat) {
        return Err(CoordError::InvalidLatitude(bounds.min_lat));
    }
    if !(MIN_LAT..=MAX_LAT).contains(&bounds.max_lat) {
        return Err(CoordError::InvalidLatitude(bounds.max_lat));
    }

    let padded = bounds.padded(padding_fraction, min_padding_deg);
    let min_lat = padded.min_lat.max(MIN_LAT);
    let max_lat = padded.max_lat.min(MAX_LAT);

    // North-west corner gives the minimum tile indices, south-east the
    // maximum: tile y grows southwards.
    let nw = coord::geo_to_tile(max_lat, padded.min_lon, zoom)?;
    let se = coord::geo_to_tile(min_lat, padded.max_lon, zoom)?;

    let tile_bounds = TileBounds {
        min_x: nw.x,
        min_y: nw.y,
        max_x: se.x,
        max_y: se.y,
        zoom,
    };

    debug!(
        min_x = tile_bounds.min_x,
        min_y = tile_bounds.min_y,
        max_x = tile_bounds.max_x,
        max_y = tile_bounds.max_y,
        tiles = tile_bounds.tile_count(),
        zoom,
        "computed tile bounds"
    );

    Ok(tile_bounds)
}
