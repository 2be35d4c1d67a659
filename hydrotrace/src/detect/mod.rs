//! Color-region detection.
//!
//! Scans a mosaic for water-colored pixels, merges matches, extracts
//! external contour boundaries, simplifies them, and reverse-maps each
//! boundary into geographic space. The whole pass is deterministic:
//! pixels are scanned in raster order and contours are discovered in a
//! fixed order, so identical input buffers produce identical output.

mod color;

pub use color::{rgb_to_hsv, HsvRange, RgbRange, WATER_HSV_RANGES, WATER_RGB_BACKUP, WATER_RGB_RANGES};

use crate::mosaic::Mosaic;
use crate::region::{GeoPoint, GeoPolygon};
use image::{GrayImage, Luma, RgbaImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::distance_transform::Norm;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::morphology::close;
use imageproc::point::Point;
use tracing::{debug, info};

/// Which color model drives the match mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorKind {
    /// HSV range matching with a direct-channel RGB backup range (default).
    #[default]
    Hsv,
    /// RGB-only range matching.
    Rgb,
}

/// Detection parameters.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Color model strategy
    pub kind: DetectorKind,
    /// HSV target ranges, OR-combined (used by [`DetectorKind::Hsv`])
    pub hsv_ranges: Vec<HsvRange>,
    /// Direct-channel backup range OR-ed into the HSV match
    pub rgb_backup: Option<RgbRange>,
    /// RGB target ranges (used by [`DetectorKind::Rgb`])
    pub rgb_ranges: Vec<RgbRange>,
    /// Noise floor: contours below this pixel area are discarded
    pub min_area_px: f64,
    /// Simplification epsilon as a fraction of contour perimeter
    pub tolerance_ratio: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            kind: DetectorKind::Hsv,
            hsv_ranges: WATER_HSV_RANGES.to_vec(),
            rgb_backup: Some(WATER_RGB_BACKUP),
            rgb_ranges: WATER_RGB_RANGES.to_vec(),
            min_area_px: 30.0,
            tolerance_ratio: 0.01,
        }
    }
}

impl DetectorConfig {
    /// Selects the color model strategy.
    pub fn with_kind(mut self, kind: DetectorKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the minimum contour pixel area.
    pub fn with_min_area_px(mut self, min_area_px: f64) -> Self {
        self.min_area_px = min_area_px;
        self
    }

    /// Sets the simplification tolerance as a fraction of perimeter.
    pub fn with_tolerance_ratio(mut self, tolerance_ratio: f64) -> Self {
        self.tolerance_ratio = tolerance_ratio;
        self
    }
}

/// A water region detected in the mosaic and mapped to geographic space.
///
/// Fields are set exactly once: geometry and pixel area by the detector,
/// `within_region` by the containment filter.
#[derive(Debug, Clone)]
pub struct DetectedPolygon {
    /// 1-based id in contour discovery order
    pub id: u32,
    /// Closed geographic ring
    pub geometry: GeoPolygon,
    /// Pixel area of the source contour (informational)
    pub pixel_area: u64,
    /// Set by the containment filter
    pub within_region: bool,
}

/// Detects water-colored regions in the mosaic.
///
/// Zero matches is not an error: the result is simply empty.
pub fn detect(mosaic: &Mosaic, config: &DetectorConfig) -> Vec<DetectedPolygon> {
    let match_mask = build_match_mask(mosaic.image(), config);

    // 3×3 closing merges near-adjacent matches and drops speckle
    let closed = close(&match_mask, Norm::LInf, 1);

    // Contour tracing needs a background border: a matched region
    // touching the mosaic edge would otherwise yield no contour at all.
    // Trace on a 1-pixel-padded copy and shift the points back.
    let mut bordered = GrayImage::new(closed.width() + 2, closed.height() + 2);
    for (x, y, pixel) in closed.enumerate_pixels() {
        bordered.put_pixel(x + 1, y + 1, *pixel);
    }

    let contours = find_contours::<i32>(&bordered);
    debug!(contours = contours.len(), "extracted contours");

    let mut polygons = Vec::new();

    // External boundaries only; holes are not tracked and do not
    // consume ids.
    let outer = contours
        .iter()
        .filter(|contour| contour.border_type == BorderType::Outer);

    for (index, contour) in outer.enumerate() {
        let points: Vec<Point<i32>> = contour
            .points
            .iter()
            .map(|p| Point::new(p.x - 1, p.y - 1))
            .collect();

        let area = contour_area(&points);
        if area < config.min_area_px {
            continue;
        }

        let perimeter = arc_length(&points, true);
        let epsilon = config.tolerance_ratio * perimeter;
        let simplified = approximate_polygon_dp(&points, epsilon, true);

        let vertices: Vec<GeoPoint> = simplified
            .iter()
            .map(|p| {
                let (lat, lon) = mosaic.pixel_to_geo(p.x, p.y);
                GeoPoint::new(lat, lon)
            })
            .collect();

        // Needs at least 3 distinct vertices to form a ring; a contour
        // that simplifies below that is dropped, not an error.
        match GeoPolygon::new(vertices) {
            Ok(geometry) => polygons.push(DetectedPolygon {
                id: (index + 1) as u32,
                geometry,
                pixel_area: area as u64,
                within_region: false,
            }),
            Err(e) => {
                debug!(contour = index, error = %e, "contour degenerate after simplification");
            }
        }
    }

    info!(detected = polygons.len(), "water region detection complete");
    polygons
}

/// Builds the binary match mask for the configured color model.
fn build_match_mask(image: &RgbaImage, config: &DetectorConfig) -> GrayImage {
    let mut mask = GrayImage::new(image.width(), image.height());

    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;

        let matched = match config.kind {
            DetectorKind::Hsv => {
                let hsv = rgb_to_hsv(r, g, b);
                config.hsv_ranges.iter().any(|range| range.contains(hsv))
                    || config
                        .rgb_backup
                        .is_some_and(|range| range.contains([r, g, b]))
            }
            DetectorKind::Rgb => config.rgb_ranges.iter().any(|range| range.contains([r, g, b])),
        };

        if matched {
            mask.put_pixel(x, y, Luma([255]));
        }
    }

    mask
}

/// Shoelace area of a contour's boundary pixels.
fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut doubled: i64 = 0;
    for i in 0..points.len() {
        let p = points[i];
        let q = points[(i + 1) % points.len()];
        doubled += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    doubled.abs() as f64 / 2.0
}
