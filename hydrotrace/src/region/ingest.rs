//! GeoJSON ingestion for region boundaries.
//!
//! Accepts a Feature, a bare Polygon geometry, or a FeatureCollection
//! (first feature used). Only the exterior ring of the polygon is read;
//! holes and additional parts are out of scope.

use super::{GeoPoint, GeoPolygon, Region, RegionError};
use geojson::{Feature, GeoJson, Value};
use tracing::debug;

/// Parses a region boundary from GeoJSON text.
///
/// The region name is taken from the feature's `properties.name`,
/// defaulting to `"Unknown"`.
pub fn region_from_geojson_str(input: &str) -> Result<Region, RegionError> {
    let geojson: GeoJson = input.parse()?;

    let feature = match geojson {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .next()
            .ok_or(RegionError::EmptyFeatureCollection)?,
        GeoJson::Feature(feature) => feature,
        GeoJson::Geometry(geometry) => Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        },
    };

    let name = feature
        .properties
        .as_ref()
        .and_then(|props| props.get("name"))
        .and_then(|value| value.as_str())
        .unwrap_or("Unknown")
        .to_string();

    let geometry = feature.geometry.ok_or(RegionError::MissingGeometry)?;

    let rings = match geometry.value {
        Value::Polygon(rings) => rings,
        other => return Err(RegionError::NotAPolygon(other.type_name().to_string())),
    };

    let exterior = rings
        .into_iter()
        .next()
        .ok_or(RegionError::TooFewVertices(0))?;

    // GeoJSON positions are [lon, lat]
    let points = exterior
        .iter()
        .filter(|position| position.len() >= 2)
        .map(|position| GeoPoint::new(position[1], position[0]))
        .collect::<Vec<_>>();

    let boundary = GeoPolygon::new(points)?;
    debug!(
        name = %name,
        vertices = boundary.len(),
        "parsed region boundary"
    );

    Ok(Region { name, boundary })
}
