//! Region-of-interest geometry
//!
//! Defines the geographic point/polygon types shared across the pipeline
//! and their validation rules. A region is a single simple ring: no holes,
//! no multi-part geometry. GeoJSON ingestion lives in [`ingest`].

mod ingest;

pub use ingest::region_from_geojson_str;

use crate::coord::{MAX_LON, MIN_LON};
use thiserror::Error;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Axis-aligned geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Latitude extent in degrees.
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude extent in degrees.
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Whether the point lies inside the box (boundary inclusive).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lon >= self.min_lon
            && point.lon <= self.max_lon
    }

    /// Expands the box by `max(fraction * span, min_deg)` per axis.
    ///
    /// The floor guarantees visible context around very small regions
    /// (0.005° is roughly 500 m); the fraction scales for large ones.
    /// Longitude is clamped to the valid range; latitude clamping to the
    /// projection domain happens at tile conversion.
    pub fn padded(&self, fraction: f64, min_deg: f64) -> GeoBounds {
        let lat_padding = (self.lat_span() * fraction).max(min_deg);
        let lon_padding = (self.lon_span() * fraction).max(min_deg);

        GeoBounds {
            min_lat: self.min_lat - lat_padding,
            min_lon: (self.min_lon - lon_padding).max(MIN_LON),
            max_lat: self.max_lat + lat_padding,
            max_lon: (self.max_lon + lon_padding).min(MAX_LON),
        }
    }

    /// Planar bounding-box area proxy in square degrees.
    ///
    /// Not a geodesic area; used only as a comparable magnitude in the
    /// analysis record.
    pub fn area_proxy(&self) -> f64 {
        self.lat_span() * self.lon_span()
    }
}

/// A closed simple ring of geographic points.
///
/// Invariants, enforced at construction: first point equals the last,
/// at least 4 points (3 distinct vertices), every coordinate within
/// valid geographic range.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPolygon {
    points: Vec<GeoPoint>,
}

impl GeoPolygon {
    /// Builds a polygon from a ring of points, closing it if necessary.
    pub fn new(mut points: Vec<GeoPoint>) -> Result<Self, RegionError> {
        for p in &points {
            if !(-90.0..=90.0).contains(&p.lat) || !(MIN_LON..=MAX_LON).contains(&p.lon) {
                return Err(RegionError::InvalidCoordinate {
                    lat: p.lat,
                    lon: p.lon,
                });
            }
        }

        if points.len() >= 3 && points.first() != points.last() {
            points.push(points[0]);
        }

        let distinct = {
            let open = &points[..points.len().saturating_sub(1)];
            let mut seen: Vec<GeoPoint> = Vec::with_capacity(open.len());
            for p in open {
                if !seen.contains(p) {
                    seen.push(*p);
                }
            }
            seen.len()
        };

        if points.len() < 4 || distinct < 3 {
            return Err(RegionError::TooFewVertices(distinct));
        }

        Ok(Self { points })
    }

    /// The full closed ring, first point repeated at the end.
    pub fn ring(&self) -> &[GeoPoint] {
        &self.points
    }

    /// The ring without its closing duplicate.
    pub fn open_ring(&self) -> &[GeoPoint] {
        &self.points[..self.points.len() - 1]
    }

    /// Number of points including the closing duplicate.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned bounding box of the ring.
    pub fn bounding_box(&self) -> GeoBounds {
        let mut bounds = GeoBounds {
            min_lat: f64::INFINITY,
            min_lon: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        for p in &self.points {
            bounds.min_lat = bounds.min_lat.min(p.lat);
            bounds.min_lon = bounds.min_lon.min(p.lon);
            bounds.max_lat = bounds.max_lat.max(p.lat);
            bounds.max_lon = bounds.max_lon.max(p.lon);
        }
        bounds
    }

    /// Vertex-mean centroid, closing duplicate excluded.
    ///
    /// This is the cheap centroid used for containment pre-filtering,
    /// not the area-weighted centroid.
    pub fn centroid(&self) -> GeoPoint {
        let open = self.open_ring();
        let n = open.len() as f64;
        let lat = open.iter().map(|p| p.lat).sum::<f64>() / n;
        let lon = open.iter().map(|p| p.lon).sum::<f64>() / n;
        GeoPoint { lat, lon }
    }
}

/// A named region of interest bounded by a single simple ring.
#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    pub boundary: GeoPolygon,
}

/// Errors raised while ingesting or validating region geometry.
///
/// All of these are fatal and surface to the caller before any tile
/// fetch is attempted.
#[derive(Debug, Error)]
pub enum RegionError {
    /// GeoJSON text failed to parse
    #[error("invalid GeoJSON: {0}")]
    InvalidGeoJson(#[from] geojson::Error),

    /// FeatureCollection contained no features
    #[error("GeoJSON feature collection is empty")]
    EmptyFeatureCollection,

    /// Feature had no geometry member
    #[error("GeoJSON feature has no geometry")]
    MissingGeometry,

    /// Geometry was not a polygon
    #[error("expected Polygon geometry, found {0}")]
    NotAPolygon(String),

    /// Ring had fewer than 3 distinct vertices
    #[error("polygon ring has only {0} distinct vertices (need at least 3)")]
    TooFewVertices(usize),

    /// A coordinate was outside geographic range
    #[error("coordinate out of range: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> GeoPolygon {
        GeoPolygon::new(vec![
            GeoPoint::new(min, min),
            GeoPoint::new(min, max),
            GeoPoint::new(max, max),
            GeoPoint::new(max, min),
            GeoPoint::new(min, min),
        ])
        .unwrap()
    }

    #[test]
    fn test_open_ring_is_closed_on_construction() {
        let polygon = GeoPolygon::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 1.0),
        ])
        .unwrap();

        assert_eq!(polygon.len(), 4);
        assert_eq!(polygon.ring().first(), polygon.ring().last());
        assert_eq!(polygon.open_ring().len(), 3);
    }

    #[test]
    fn test_too_few_distinct_vertices_rejected() {
        let result = GeoPolygon::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
        ]);
        assert!(matches!(result, Err(RegionError::TooFewVertices(2))));
    }

    #[test]
    fn test_out_of_range_coordinate_rejected() {
        let result = GeoPolygon::new(vec![
            GeoPoint::new(91.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 1.0),
        ]);
        assert!(matches!(
            result,
            Err(RegionError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_bounding_box() {
        let polygon = square(10.0, 12.0);
        let bounds = polygon.bounding_box();
        assert_eq!(bounds.min_lat, 10.0);
        assert_eq!(bounds.max_lat, 12.0);
        assert_eq!(bounds.lat_span(), 2.0);
        assert_eq!(bounds.lon_span(), 2.0);
    }

    #[test]
    fn test_centroid_excludes_closing_duplicate() {
        let polygon = square(0.0, 2.0);
        let centroid = polygon.centroid();
        // Mean of the 4 distinct corners, not skewed by the repeated first
        assert!((centroid.lat - 1.0).abs() < 1e-12);
        assert!((centroid.lon - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_padding_floor_applies_to_tiny_regions() {
        let bounds = GeoBounds {
            min_lat: 11.0,
            min_lon: 77.0,
            max_lat: 11.001,
            max_lon: 77.001,
        };
        let padded = bounds.padded(0.5, 0.005);

        // 50% of a 0.001° span is far below the floor
        assert!((padded.min_lat - (11.0 - 0.005)).abs() < 1e-12);
        assert!((padded.max_lat - (11.001 + 0.005)).abs() < 1e-12);
        assert!((padded.min_lon - (77.0 - 0.005)).abs() < 1e-12);
    }

    #[test]
    fn test_padding_scales_with_larger_regions() {
        let bounds = GeoBounds {
            min_lat: 11.0,
            min_lon: 77.0,
            max_lat: 11.02,
            max_lon: 77.02,
        };
        let padded = bounds.padded(0.5, 0.005);

        // 50% of a 0.02° span is 0.01°, above the floor
        assert!((padded.min_lat - (11.0 - 0.01)).abs() < 1e-12);
        assert!((padded.max_lon - (77.02 + 0.01)).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = GeoBounds {
            min_lat: 0.0,
            min_lon: 0.0,
            max_lat: 10.0,
            max_lon: 10.0,
        };
        assert!(bounds.contains(&GeoPoint::new(5.0, 5.0)));
        assert!(bounds.contains(&GeoPoint::new(0.0, 10.0)));
        assert!(!bounds.contains(&GeoPoint::new(10.1, 5.0)));
    }
}
