//! Mosaic assembly
//!
//! Composes individually fetched 256×256 tiles into one contiguous
//! raster. The mosaic owns its pixel buffer for the duration of a run
//! and is not mutated after assembly; masking and cropping produce
//! derived rasters.

mod bounds;

pub use bounds::{tile_bounds, TileBounds};

use crate::coord::{self, CoordError, PixelPoint, TileOrigin, TILE_SIZE};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::collections::HashMap;
use tracing::{debug, warn};

/// A contiguous raster assembled from slippy-map tiles.
///
/// Carries its origin tile so pixel coordinates can be mapped to and
/// from geographic coordinates.
pub struct Mosaic {
    image: RgbaImage,
    origin: TileOrigin,
}

impl Mosaic {
    /// Assembles tiles into a mosaic.
    ///
    /// Each tile is pasted at `((x - min_x) * 256, (y - min_y) * 256)`.
    /// Missing map entries leave their block blank (transparent black).
    /// Tiles that are not 256×256 are resampled to the canonical size so
    /// a misbehaving server cannot shift the pixel grid.
    pub fn assemble(tiles: &HashMap<(u32, u32), RgbaImage>, bounds: &TileBounds) -> Mosaic {
        let mut canvas = RgbaImage::new(bounds.width_px(), bounds.height_px());

        let mut pasted = 0usize;
        for tile in bounds.tiles() {
            let Some(raster) = tiles.get(&(tile.x, tile.y)) else {
                continue;
            };

            let dx = ((tile.x - bounds.min_x) * TILE_SIZE) as i64;
            let dy = ((tile.y - bounds.min_y) * TILE_SIZE) as i64;

            if raster.width() != TILE_SIZE || raster.height() != TILE_SIZE {
                warn!(
                    tile = %tile,
                    width = raster.width(),
                    height = raster.height(),
                    "resampling non-canonical tile"
                );
                let resized =
                    imageops::resize(raster, TILE_SIZE, TILE_SIZE, FilterType::Triangle);
                imageops::replace(&mut canvas, &resized, dx, dy);
            } else {
                imageops::replace(&mut canvas, raster, dx, dy);
            }
            pasted += 1;
        }

        debug!(
            width = canvas.width(),
            height = canvas.height(),
            pasted,
            expected = bounds.tile_count(),
            "assembled mosaic"
        );

        Mosaic {
            image: canvas,
            origin: bounds.origin(),
        }
    }

    /// Wraps an existing raster as a mosaic anchored at `origin`.
    ///
    /// Used by tests and by callers that already hold a stitched image.
    pub fn from_image(image: RgbaImage, origin: TileOrigin) -> Mosaic {
        Mosaic { image, origin }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn origin(&self) -> TileOrigin {
        self.origin
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Maps a mosaic pixel to geographic coordinates.
    pub fn pixel_to_geo(&self, px: i32, py: i32) -> (f64, f64) {
        coord::pixel_to_geo(px, py, &self.origin)
    }

    /// Maps geographic coordinates to a mosaic pixel.
    pub fn geo_to_pixel(&self, lat: f64, lon: f64) -> Result<PixelPoint, CoordError> {
        coord::geo_to_pixel(lat, lon, &self.origin)
    }
}
