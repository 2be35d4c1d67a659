//! Analysis aggregation.
//!
//! Summarizes the filtered polygon set against the region into a
//! JSON-serializable record. Purely a read step: the record is
//! deterministic given its inputs, and a zero-polygon input produces a
//! zeroed record rather than an error.

use crate::detect::DetectedPolygon;
use crate::region::GeoPolygon;
use serde::Serialize;

/// Region metadata in the analysis record.
#[derive(Debug, Clone, Serialize)]
pub struct RegionInfo {
    pub name: String,
    /// Planar bbox-area proxy in square degrees, not a geodesic area
    pub bbox_area: f64,
    /// Ring length including the closing duplicate
    pub coordinate_count: usize,
}

/// Per-polygon summary in the analysis record.
#[derive(Debug, Clone, Serialize)]
pub struct PolygonSummary {
    pub id: u32,
    /// Vertex-mean centroid as `[lon, lat]`
    pub center_coordinates: [f64; 2],
    /// Planar bbox-area proxy in square degrees
    pub bbox_area: f64,
    pub area_pixels: u64,
    pub within_region: bool,
}

/// Aggregate record for one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRecord {
    pub region: RegionInfo,
    pub water_polygon_count: usize,
    pub polygons: Vec<PolygonSummary>,
    /// Sum of the polygons' bbox-area proxies, square degrees
    pub total_water_area: f64,
}

/// Builds the analysis record for a filtered polygon set.
pub fn summarize(
    filtered: &[DetectedPolygon],
    region: &GeoPolygon,
    region_name: &str,
) -> AnalysisRecord {
    let region_bounds = region.bounding_box();

    let polygons: Vec<PolygonSummary> = filtered
        .iter()
        .map(|polygon| {
            let bounds = polygon.geometry.bounding_box();
            let centroid = polygon.geometry.centroid();
            PolygonSummary {
                id: polygon.id,
                center_coordinates: [centroid.lon, centroid.lat],
                bbox_area: bounds.area_proxy(),
                area_pixels: polygon.pixel_area,
                within_region: polygon.within_region,
            }
        })
        .collect();

    let total_water_area = polygons.iter().map(|p| p.bbox_area).sum();

    AnalysisRecord {
        region: RegionInfo {
            name: region_name.to_string(),
            bbox_area: region_bounds.area_proxy(),
            coordinate_count: region.len(),
        },
        water_polygon_count: polygons.len(),
        polygons,
        total_water_area,
    }
}
