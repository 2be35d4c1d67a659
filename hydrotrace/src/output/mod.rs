//! GeoJSON export of detected water polygons.

use crate::detect::DetectedPolygon;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

/// Builds a GeoJSON FeatureCollection from the filtered polygon set.
///
/// Each feature carries the polygon's exterior ring (positions as
/// `[lon, lat]`) and summary properties. The collection's foreign
/// members record the polygon count and the zoom level the detection
/// ran at. An empty input produces a valid empty collection.
pub fn polygons_to_geojson(polygons: &[DetectedPolygon], zoom: u8) -> FeatureCollection {
    let features = polygons.iter().map(polygon_to_feature).collect();

    let mut foreign_members = JsonObject::new();
    foreign_members.insert("total_polygons".to_string(), json!(polygons.len()));
    foreign_members.insert("detection_zoom_level".to_string(), json!(zoom));

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign_members),
    }
}

fn polygon_to_feature(polygon: &DetectedPolygon) -> Feature {
    let ring: Vec<Vec<f64>> = polygon
        .geometry
        .ring()
        .iter()
        .map(|point| vec![point.lon, point.lat])
        .collect();

    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), json!(polygon.id));
    properties.insert("type".to_string(), json!("water_polygon"));
    properties.insert("area_pixels".to_string(), json!(polygon.pixel_area));
    properties.insert("within_region".to_string(), json!(polygon.within_region));
    properties.insert(
        "coordinate_count".to_string(),
        json!(polygon.geometry.len()),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
