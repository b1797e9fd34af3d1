//! Writer für GeoJSON-FeatureCollections.

use super::GeoJsonError;
use crate::core::{Feature, FeatureSet, PolygonGeometry};
use geo::{LineString, Polygon};
use serde_json::{json, Value};

/// Schreibt ein Feature-Set als kompakte GeoJSON-FeatureCollection.
pub fn write_feature_collection(set: &FeatureSet) -> Result<String, GeoJsonError> {
    Ok(serde_json::to_string(&feature_collection_value(set)?)?)
}

/// Baut die FeatureCollection als JSON-Wert (CRS wird übernommen, falls gesetzt).
pub fn feature_collection_value(set: &FeatureSet) -> Result<Value, GeoJsonError> {
    let features = set
        .iter()
        .map(feature_value)
        .collect::<Result<Vec<_>, _>>()?;

    let mut root = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    if let Some(crs) = &set.crs {
        root["crs"] = match &crs.source {
            Some(source) => source.clone(),
            None => json!({
                "type": "name",
                "properties": { "name": crs.name },
            }),
        };
    }
    Ok(root)
}

fn feature_value(feature: &Feature) -> Result<Value, GeoJsonError> {
    let mut value = json!({
        "type": "Feature",
        "geometry": geometry_value(&feature.geometry),
        "properties": serde_json::to_value(&feature.properties)?,
    });
    if let Some(id) = &feature.id {
        value["id"] = serde_json::to_value(id)?;
    }
    Ok(value)
}

fn geometry_value(geometry: &PolygonGeometry) -> Value {
    match geometry {
        PolygonGeometry::Polygon(polygon) => json!({
            "type": "Polygon",
            "coordinates": polygon_coordinates(polygon),
        }),
        PolygonGeometry::MultiPolygon(multi) => json!({
            "type": "MultiPolygon",
            "coordinates": multi.0.iter().map(polygon_coordinates).collect::<Vec<_>>(),
        }),
    }
}

fn polygon_coordinates(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring_coordinates)
        .collect()
}

fn ring_coordinates(ring: &LineString<f64>) -> Vec<[f64; 2]> {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::tests::rect;
    use crate::core::{AttributeValue, Crs};
    use crate::geojson::parse_feature_collection;
    use chrono::TimeZone;

    #[test]
    fn writes_named_crs_and_closed_rings() {
        let set = FeatureSet::new(vec![Feature::new(rect(0.0, 0.0, 1.0, 1.0))])
            .with_crs(Crs::new("EPSG:25832"));
        let value = feature_collection_value(&set).expect("serialisierbar");

        assert_eq!(value["crs"]["type"], "name");
        assert_eq!(value["crs"]["properties"]["name"], "EPSG:25832");
        let ring = &value["features"][0]["geometry"]["coordinates"][0];
        assert_eq!(ring.as_array().map(Vec::len), Some(5));
        assert_eq!(ring[0], ring[4]);
    }

    #[test]
    fn parsed_crs_object_is_written_unchanged() {
        let text = r#"{"type": "FeatureCollection", "features": [],
            "crs": {"type": "link", "properties": {"href": "http://example.org/crs", "type": "proj4"}}}"#;
        let set = parse_feature_collection(text).expect("gültige Collection");
        let value = feature_collection_value(&set).expect("serialisierbar");

        assert_eq!(
            value["crs"],
            json!({"type": "link", "properties": {"href": "http://example.org/crs", "type": "proj4"}})
        );
    }

    #[test]
    fn timestamp_is_read_back_as_text() {
        let at = chrono::Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
            .single()
            .expect("gültiges Datum");
        let set = FeatureSet::new(vec![
            Feature::new(rect(0.0, 0.0, 1.0, 1.0)).with_property("merged_at", at)
        ]);
        let text = write_feature_collection(&set).expect("serialisierbar");
        let back = parse_feature_collection(&text).expect("parsebar");
        assert_eq!(
            back.features[0].property("merged_at"),
            Some(&AttributeValue::from("2024-05-01T12:30:00.000000Z"))
        );
    }

    #[test]
    fn geometry_and_properties_survive_roundtrip() {
        let mut feature = Feature::new(rect(0.0, 0.0, 2.0, 1.0))
            .with_property("name", "Wiese")
            .with_property("part_index", 2usize);
        feature.id = Some(AttributeValue::from("w-1"));
        let set = FeatureSet::new(vec![feature]);

        let back = parse_feature_collection(&write_feature_collection(&set).expect("schreibbar"))
            .expect("parsebar");
        assert_eq!(back, set);
    }
}
