//! Parser für GeoJSON-FeatureCollections.

use crate::core::{AttributeMap, AttributeValue, Crs, Feature, FeatureSet, PolygonGeometry};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{Map, Value};

/// Minimale Positionsanzahl eines geschlossenen Rings.
const MIN_RING_POSITIONS: usize = 4;

/// Fehler beim Einlesen einer FeatureCollection.
#[derive(Debug, thiserror::Error)]
pub enum GeoJsonError {
    #[error("Ungültiges JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Erwartet FeatureCollection, gefunden: {0}")]
    NotFeatureCollection(String),
    #[error("Feature {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },
}

/// Parst eine GeoJSON-FeatureCollection in ein Feature-Set.
///
/// Abgelehnt werden fehlende (`null`) Geometrien, andere Geometrietypen als
/// Polygon/MultiPolygon, Ringe mit weniger als 4 Positionen und nicht-endliche
/// Koordinaten. Höhenwerte (3. Ordinate) werden verworfen.
pub fn parse_feature_collection(text: &str) -> Result<FeatureSet, GeoJsonError> {
    let root: Value = serde_json::from_str(text)?;
    let Some(object) = root.as_object() else {
        return Err(GeoJsonError::NotFeatureCollection(json_kind(&root).into()));
    };

    let kind = object.get("type").and_then(Value::as_str).unwrap_or("");
    if kind != "FeatureCollection" {
        return Err(GeoJsonError::NotFeatureCollection(kind.to_string()));
    }

    let entries: &[Value] = match object.get("features") {
        Some(Value::Array(entries)) => entries.as_slice(),
        None | Some(Value::Null) => &[],
        Some(other) => {
            return Err(GeoJsonError::NotFeatureCollection(format!(
                "features ist {}",
                json_kind(other)
            )))
        }
    };

    let features = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            parse_feature(entry).map_err(|reason| GeoJsonError::InvalidFeature { index, reason })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut set = FeatureSet::new(features);
    match object.get("crs") {
        None | Some(Value::Null) => {}
        Some(crs @ Value::Object(_)) => set = set.with_crs(Crs::from_source(crs.clone())),
        Some(other) => log::warn!("crs ist {} und wird verworfen", json_kind(other)),
    }

    log::debug!(
        "FeatureCollection geladen: {} Features, CRS {:?}",
        set.len(),
        set.crs.as_ref().map(|c| c.name.as_str())
    );
    Ok(set)
}

fn parse_feature(entry: &Value) -> Result<Feature, String> {
    let object = entry
        .as_object()
        .ok_or_else(|| format!("Feature ist {}", json_kind(entry)))?;

    let geometry = match object.get("geometry") {
        None | Some(Value::Null) => return Err("Geometrie fehlt".into()),
        Some(value) => parse_geometry(value)?,
    };

    let properties = parse_properties(object)?;
    let id = match object.get("id") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            serde_json::from_value::<AttributeValue>(value.clone())
                .map_err(|e| format!("ungültige ID: {}", e))?,
        ),
    };

    Ok(Feature {
        id,
        geometry,
        properties,
    })
}

fn parse_properties(object: &Map<String, Value>) -> Result<AttributeMap, String> {
    match object.get("properties") {
        None | Some(Value::Null) => Ok(AttributeMap::new()),
        Some(value @ Value::Object(_)) => serde_json::from_value(value.clone())
            .map_err(|e| format!("ungültige Attribute: {}", e)),
        Some(other) => Err(format!("properties ist {}", json_kind(other))),
    }
}

fn parse_geometry(value: &Value) -> Result<PolygonGeometry, String> {
    let kind = value.get("type").and_then(Value::as_str).unwrap_or("");
    let coordinates = value
        .get("coordinates")
        .ok_or_else(|| format!("{}: coordinates fehlt", kind))?;

    match kind {
        "Polygon" => Ok(PolygonGeometry::Polygon(parse_polygon(coordinates)?)),
        "MultiPolygon" => {
            let polygons = as_array(coordinates, "MultiPolygon")?
                .iter()
                .map(parse_polygon)
                .collect::<Result<Vec<_>, _>>()?;
            if polygons.is_empty() {
                return Err("MultiPolygon ohne Polygone".into());
            }
            Ok(PolygonGeometry::MultiPolygon(MultiPolygon::new(polygons)))
        }
        "" => Err("Geometrietyp fehlt".into()),
        other => Err(format!("Geometrietyp {} nicht unterstützt", other)),
    }
}

fn parse_polygon(value: &Value) -> Result<Polygon<f64>, String> {
    let mut rings = as_array(value, "Polygon")?.iter().map(parse_ring);
    let exterior = rings
        .next()
        .ok_or_else(|| "Polygon ohne Außenring".to_string())??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn parse_ring(value: &Value) -> Result<LineString<f64>, String> {
    let positions = as_array(value, "Ring")?;
    if positions.len() < MIN_RING_POSITIONS {
        return Err(format!(
            "Ring mit {} Positionen (mindestens {})",
            positions.len(),
            MIN_RING_POSITIONS
        ));
    }
    let coords = positions
        .iter()
        .map(parse_position)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(LineString::new(coords))
}

fn parse_position(value: &Value) -> Result<Coord<f64>, String> {
    let ordinates = as_array(value, "Position")?;
    let (Some(x), Some(y)) = (
        ordinates.first().and_then(Value::as_f64),
        ordinates.get(1).and_then(Value::as_f64),
    ) else {
        return Err(format!("Position {} ohne x/y", value));
    };
    if !x.is_finite() || !y.is_finite() {
        return Err(format!("nicht-endliche Koordinate ({}, {})", x, y));
    }
    Ok(Coord { x, y })
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, String> {
    value
        .as_array()
        .ok_or_else(|| format!("{} erwartet Array, gefunden {}", what, json_kind(value)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "Zahl",
        Value::String(_) => "Text",
        Value::Array(_) => "Array",
        Value::Object(_) => "Objekt",
    }
}
