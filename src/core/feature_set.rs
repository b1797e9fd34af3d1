//! Geordnete Feature-Sammlung eines Layers (entspricht einer GeoJSON-FeatureCollection).

use super::Feature;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Koordinatensystem der Sammlung.
///
/// `name` stammt aus `crs.properties.name` (leer, wenn nicht vorhanden).
/// Ein eingelesenes `crs`-Objekt bleibt in `source` unverändert erhalten und
/// wird so auch wieder geschrieben.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crs {
    pub name: String,
    pub source: Option<serde_json::Value>,
}

impl Crs {
    /// Benanntes CRS (`{"type": "name", ...}` beim Schreiben).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
        }
    }

    /// Übernimmt ein beliebiges `crs`-Objekt aus GeoJSON.
    pub fn from_source(source: serde_json::Value) -> Self {
        let name = source
            .get("properties")
            .and_then(|props| props.get("name"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self {
            name,
            source: Some(source),
        }
    }

    /// `true` für geographische Systeme, deren Flächen in Grad² vorliegen.
    pub fn is_geographic(&self) -> bool {
        let upper = self.name.to_ascii_uppercase();
        upper.ends_with("EPSG:4326")
            || upper.ends_with("EPSG::4326")
            || upper.ends_with("CRS84")
            || upper.ends_with("EPSG:4283")
            || upper.ends_with("EPSG::4283")
    }
}

/// Herkunft der gelesenen Daten: bereits bearbeiteter oder Original-Layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLayer {
    Processed,
    Original,
}

impl SourceLayer {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceLayer::Processed => "processed",
            SourceLayer::Original => "original",
        }
    }
}

/// Geordnete Feature-Sammlung.
///
/// Features werden über ihre Position zum Zeitpunkt der Anfrage adressiert.
/// Nach jeder Bearbeitung verschieben sich alle Positionen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    /// Features in Reihenfolge
    pub features: Vec<Feature>,
    /// Koordinatensystem (wird bei der Ausgabe übernommen)
    pub crs: Option<Crs>,
}

impl FeatureSet {
    /// Erstellt ein Feature-Set ohne CRS-Kennung.
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            crs: None,
        }
    }

    /// Builder: setzt die CRS-Kennung.
    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = Some(crs);
        self
    }

    /// Anzahl der Features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// `true`, wenn keine Features vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature an Position.
    pub fn get(&self, position: usize) -> Option<&Feature> {
        self.features.get(position)
    }

    /// Iterator über alle Features.
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Teilt in (ausgewählte, übrige) Features; die Reihenfolge der übrigen bleibt erhalten.
    pub fn partition(&self, selected: &IndexSet<usize>) -> (Vec<&Feature>, Vec<Feature>) {
        let mut picked = Vec::with_capacity(selected.len());
        let mut remaining = Vec::with_capacity(self.len().saturating_sub(selected.len()));
        for (position, feature) in self.features.iter().enumerate() {
            if selected.contains(&position) {
                picked.push(feature);
            } else {
                remaining.push(feature.clone());
            }
        }
        (picked, remaining)
    }

    /// Baut das Folge-Set aus unberührten Features plus Bearbeitungsergebnis (CRS bleibt).
    pub fn rebuilt(&self, remaining: Vec<Feature>, appended: Vec<Feature>) -> FeatureSet {
        let mut features = remaining;
        features.extend(appended);
        FeatureSet {
            features,
            crs: self.crs.clone(),
        }
    }
}
