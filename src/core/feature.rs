//! Einzelnes Feature: Geometrie plus Attribute.

use super::{AttributeMap, AttributeValue, PolygonGeometry};

/// Attributnamen, die als fachliche Kennung eines Features gelten (in Prioritätsreihenfolge).
const IDENTIFIER_KEYS: [&str; 5] = ["id", "ID", "fid", "FID", "ogc_fid"];

/// Ein Feature eines Layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Optionale GeoJSON-Feature-ID (wird unverändert durchgereicht)
    pub id: Option<AttributeValue>,
    /// Flächige Geometrie
    pub geometry: PolygonGeometry,
    /// Attribute in Original-Reihenfolge
    pub properties: AttributeMap,
}

impl Feature {
    /// Erstellt ein Feature ohne Attribute.
    pub fn new(geometry: impl Into<PolygonGeometry>) -> Self {
        Self {
            id: None,
            geometry: geometry.into(),
            properties: AttributeMap::new(),
        }
    }

    /// Builder: setzt ein Attribut.
    pub fn with_property(mut self, key: &str, value: impl Into<AttributeValue>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Liest ein Attribut.
    pub fn property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }

    /// Fachliche Kennung für Rückverweise.
    ///
    /// Reihenfolge: Kennungs-Attribute, vorheriger Rückverweis (`original_feature`),
    /// GeoJSON-ID, zuletzt die Position im Feature-Set.
    pub fn identifier(&self, position: usize) -> String {
        IDENTIFIER_KEYS
            .iter()
            .chain(std::iter::once(&"original_feature"))
            .find_map(|key| self.properties.get(*key).and_then(AttributeValue::as_identifier))
            .or_else(|| self.id.as_ref().and_then(AttributeValue::as_identifier))
            .unwrap_or_else(|| position.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::tests::rect;

    #[test]
    fn identifier_prefers_attribute_keys() {
        let feature = Feature::new(rect(0.0, 0.0, 1.0, 1.0))
            .with_property("FID", 12i64)
            .with_property("name", "Acker");

        assert_eq!(feature.identifier(3), "12");
    }

    #[test]
    fn identifier_falls_back_to_feature_id_then_position() {
        let mut feature = Feature::new(rect(0.0, 0.0, 1.0, 1.0));
        assert_eq!(feature.identifier(3), "3");

        feature.id = Some(AttributeValue::Text("parcel-9".into()));
        assert_eq!(feature.identifier(3), "parcel-9");
    }

    #[test]
    fn identifier_follows_previous_back_reference() {
        let feature =
            Feature::new(rect(0.0, 0.0, 1.0, 1.0)).with_property("original_feature", "4");
        assert_eq!(feature.identifier(0), "4");
    }
}
