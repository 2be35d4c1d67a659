//! Region mask and crop.
//!
//! Rasterizes the region boundary into a binary mask over the mosaic,
//! punches the mosaic through it (outside pixels become fully
//! transparent), and tightens the raster to the mask's occupied extent.

use crate::coord::CoordError;
use crate::mosaic::Mosaic;
use crate::region::GeoPolygon;
use image::{GrayImage, Luma, RgbaImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use tracing::{debug, warn};

/// Rasterizes the region boundary into a binary mask over the mosaic.
///
/// Vertices are forward-mapped through the mosaic's origin; the filled
/// polygon is white (255) on a black (0) background.
///
/// A boundary that collapses below 3 distinct pixels at this zoom level
/// produces an empty mask; downstream handles that as the degenerate
/// empty-mask case rather than an error.
pub fn rasterize_region(boundary: &GeoPolygon, mosaic: &Mosaic) -> Result<GrayImage, CoordError> {
    let mut mask = GrayImage::new(mosaic.width(), mosaic.height());

    let mut points: Vec<Point<i32>> = Vec::with_capacity(boundary.open_ring().len());
    for vertex in boundary.open_ring() {
        let px = mosaic.geo_to_pixel(vertex.lat, vertex.lon)?;
        let point = Point::new(px.x, px.y);
        // Pixel quantisation can merge adjacent vertices
        if points.last() != Some(&point) {
            points.push(point);
        }
    }
    // The polygon drawer requires an open ring
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    if points.len() < 3 {
        warn!(
            vertices = points.len(),
            "region collapsed below 3 pixels at this zoom; mask left empty"
        );
        return Ok(mask);
    }

    draw_polygon_mut(&mut mask, &points, Luma([255u8]));
    Ok(mask)
}

/// Minimal bounding box `(min_x, min_y, max_x, max_y)` of mask-true
/// pixels, or `None` if the mask is empty.
pub fn mask_extent(mask: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    let mut extent: Option<(u32, u32, u32, u32)> = None;

    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel[0] == 0 {
            continue;
        }
        extent = Some(match extent {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }

    extent
}

/// Applies the mask to the mosaic and crops to the occupied extent.
///
/// Outside-mask pixels become fully transparent. If the mask is empty
/// (region entirely off the mosaic) the full untrimmed transparent
/// raster is returned rather than failing.
pub fn apply_and_crop(mosaic: &Mosaic, mask: &GrayImage) -> RgbaImage {
    let mut masked = RgbaImage::new(mosaic.width(), mosaic.height());

    for (x, y, pixel) in mosaic.image().enumerate_pixels() {
        if mask.get_pixel(x, y)[0] > 0 {
            let mut p = *pixel;
            p[3] = 255;
            masked.put_pixel(x, y, p);
        }
    }

    match mask_extent(mask) {
        Some((min_x, min_y, max_x, max_y)) => {
            let width = max_x - min_x + 1;
            let height = max_y - min_y + 1;
            debug!(min_x, min_y, width, height, "cropped raster to mask extent");
            image::imageops::crop_imm(&masked, min_x, min_y, width, height).to_image()
        }
        None => {
            warn!("mask is empty; returning full untrimmed transparent raster");
            masked
        }
    }
}
