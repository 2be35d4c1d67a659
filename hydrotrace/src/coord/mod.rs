//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude),
//! fractional Web Mercator tile coordinates, and integer pixel coordinates
//! within an assembled tile mosaic.
//!
//! Three coordinate spaces are involved:
//!
//! - geodetic degrees (WGS84-like lat/lon)
//! - tile-grid units at a zoom level (fractional for sub-tile positions)
//! - mosaic pixel space, anchored at a [`TileOrigin`]
//!
//! The pixel-space conversions go through *fractional* tile coordinates
//! rather than integer tile addresses; rounding through integers first
//! would lose sub-tile precision and shift every feature by up to a tile.

mod types;

pub use types::{
    CoordError, PixelPoint, TileCoord, TileOrigin, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON,
    MIN_ZOOM, TILE_SIZE,
};

use std::f64::consts::PI;

fn validate(lat: f64, lon: f64, zoom: u8) -> Result<(), CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }
    Ok(())
}

/// Converts geographic coordinates to fractional tile coordinates.
///
/// This is the un-floored Web Mercator forward projection. Flooring the
/// result gives the integer tile address; keeping the fraction gives the
/// exact position within that tile.
///
/// # Errors
///
/// Latitude outside the Web Mercator domain (±85.05112878°) is rejected
/// rather than clamped: the vertical projection diverges there and a
/// silently clamped value would place features at the wrong latitude.
#[inline]
pub fn geo_to_fractional_tile(lat: f64, lon: f64, zoom: u8) -> Result<(f64, f64), CoordError> {
    validate(lat, lon, zoom)?;

    let n = 2.0_f64.powi(zoom as i32);
    let x = (lon + 180.0) / 360.0 * n;

    let lat_rad = lat.to_radians();
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n;

    Ok((x, y))
}

/// Converts geographic coordinates to an integer tile address.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 19)
#[inline]
pub fn geo_to_tile(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    let (x_exact, y_exact) = geo_to_fractional_tile(lat, lon, zoom)?;

    // lon = 180.0 and lat = MIN_LAT sit exactly on the grid edge;
    // clamp into the last valid tile.
    let max_index = (1u32 << zoom) - 1;
    let x = (x_exact.floor() as i64).clamp(0, max_index as i64) as u32;
    let y = (y_exact.floor() as i64).clamp(0, max_index as i64) as u32;

    Ok(TileCoord { x, y, zoom })
}

/// Converts a tile address back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's north-west corner.
#[inline]
pub fn tile_to_geo(tile: &TileCoord) -> (f64, f64) {
    let n = 2.0_f64.powi(tile.zoom as i32);

    let lon = tile.x as f64 / n * 360.0 - 180.0;

    let y = tile.y as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad.to_degrees();

    (lat, lon)
}

/// Converts geographic coordinates to pixel coordinates within a mosaic.
///
/// Goes through fractional tile coordinates so the result is accurate to
/// the pixel, then truncates: `px = floor((x_exact - origin.x) * 256)`.
///
/// Points west or north of the origin tile produce negative coordinates.
#[inline]
pub fn geo_to_pixel(lat: f64, lon: f64, origin: &TileOrigin) -> Result<PixelPoint, CoordError> {
    let (x_exact, y_exact) = geo_to_fractional_tile(lat, lon, origin.zoom)?;

    let px = ((x_exact - origin.x as f64) * TILE_SIZE as f64).floor() as i32;
    let py = ((y_exact - origin.y as f64) * TILE_SIZE as f64).floor() as i32;

    Ok(PixelPoint { x: px, y: py })
}

/// Converts mosaic pixel coordinates back to geographic coordinates.
///
/// Inverse of [`geo_to_pixel`]: reconstructs fractional tile coordinates
/// `origin + p/256` and applies the inverse Web Mercator projection.
///
/// Pixel quantisation bounds the round-trip error at 1/256 of a tile
/// width, i.e. sub-meter to meter depending on zoom.
#[inline]
pub fn pixel_to_geo(px: i32, py: i32, origin: &TileOrigin) -> (f64, f64) {
    let x_exact = origin.x as f64 + px as f64 / TILE_SIZE as f64;
    let y_exact = origin.y as f64 + py as f64 / TILE_SIZE as f64;

    let n = 2.0_f64.powi(origin.zoom as i32);
    let lon = x_exact / n * 360.0 - 180.0;
    let lat_rad = (PI * (1.0 - 2.0 * y_exact / n)).sinh().atan();
    let lat = lat_rad.to_degrees();

    (lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_york_city_at_zoom_16() {
        // New York City: 40.7128°N, 74.0060°W
        let result = geo_to_tile(40.7128, -74.0060, 16);
        assert!(result.is_ok(), "Valid coordinates should not error");

        let tile = result.unwrap();
        assert_eq!(tile.x, 19295);
        assert_eq!(tile.y, 24640);
        assert_eq!(tile.zoom, 16);
    }

    #[test]
    fn test_invalid_latitude() {
        let result = geo_to_tile(90.0, 0.0, 10);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_invalid_longitude() {
        let result = geo_to_tile(0.0, 181.0, 10);
        assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
    }

    #[test]
    fn test_invalid_zoom() {
        let result = geo_to_tile(0.0, 0.0, 20);
        assert!(matches!(result, Err(CoordError::InvalidZoom(20))));
    }

    #[test]
    fn test_tile_to_geo_is_northwest_corner() {
        let tile = TileCoord {
            x: 19295,
            y: 24640,
            zoom: 16,
        };

        let (lat, lon) = tile_to_geo(&tile);

        // Close to NYC but not exact (north-west corner of the tile)
        assert!((lat - 40.713).abs() < 0.01);
        assert!((lon - (-74.007)).abs() < 0.01);
    }

    #[test]
    fn test_tile_grid_consistent_across_zoom_doubling() {
        // Tile corners at zoom z+1 bracket the zoom-z position: the
        // point's tile index doubles (or doubles plus one) per zoom step.
        let lat = 51.5074; // London
        let lon = -0.1278;

        for zoom in [5, 10, 15, 18] {
            let coarse = geo_to_tile(lat, lon, zoom).unwrap();
            let fine = geo_to_tile(lat, lon, zoom + 1).unwrap();

            assert!(
                fine.x == coarse.x * 2 || fine.x == coarse.x * 2 + 1,
                "zoom {} x {} vs zoom {} x {}",
                zoom,
                coarse.x,
                zoom + 1,
                fine.x
            );
            assert!(fine.y == coarse.y * 2 || fine.y == coarse.y * 2 + 1);

            // The tile's NW corner must lie north-west of the point itself.
            let (corner_lat, corner_lon) = tile_to_geo(&coarse);
            assert!(corner_lat >= lat);
            assert!(corner_lon <= lon);
        }
    }

    #[test]
    fn test_pixel_round_trip_within_one_pixel() {
        let origin_cases = [
            (10u8, 40.4165, -3.7026),  // Madrid
            (15u8, 11.0168, 77.4126),  // Tamil Nadu
            (18u8, -33.8688, 151.2093), // Sydney
        ];

        for (zoom, lat, lon) in origin_cases {
            let tile = geo_to_tile(lat, lon, zoom).unwrap();
            let origin = TileOrigin {
                x: tile.x,
                y: tile.y,
                zoom,
            };

            let px = geo_to_pixel(lat, lon, &origin).unwrap();
            let (back_lat, back_lon) = pixel_to_geo(px.x, px.y, &origin);

            // One pixel is 1/256 of a tile
            let n = 2.0_f64.powi(zoom as i32);
            let pixel_lon_span = 360.0 / n / 256.0;

            assert!(
                (back_lon - lon).abs() <= pixel_lon_span,
                "zoom {}: lon error {} exceeds pixel span {}",
                zoom,
                (back_lon - lon).abs(),
                pixel_lon_span
            );
            // Latitude spacing varies with latitude; 2x the equatorial
            // pixel span is a safe bound below 85°.
            assert!(
                (back_lat - lat).abs() <= 2.0 * pixel_lon_span,
                "zoom {}: lat error {} too large",
                zoom,
                (back_lat - lat).abs()
            );
        }
    }

    #[test]
    fn test_pixel_coordinates_negative_west_of_origin() {
        let origin = TileOrigin {
            x: 16384,
            y: 16384,
            zoom: 15,
        };

        // A point west of the origin tile's west edge
        let (corner_lat, corner_lon) = tile_to_geo(&TileCoord {
            x: 16384,
            y: 16384,
            zoom: 15,
        });
        let px = geo_to_pixel(corner_lat, corner_lon - 0.001, &origin).unwrap();
        assert!(px.x < 0);
    }

    #[test]
    fn test_fractional_tile_matches_floored_tile() {
        let (lat, lon, zoom) = (40.7128, -74.0060, 16);
        let (x_exact, y_exact) = geo_to_fractional_tile(lat, lon, zoom).unwrap();
        let tile = geo_to_tile(lat, lon, zoom).unwrap();

        assert_eq!(x_exact.floor() as u32, tile.x);
        assert_eq!(y_exact.floor() as u32, tile.y);
    }
}
