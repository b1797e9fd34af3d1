//! Persistenz von Layern: Original-Features plus optionaler bearbeiteter Stand.

use crate::core::{FeatureSet, SourceLayer};
use crate::geojson::{parse_feature_collection, write_feature_collection};
use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Kennung eines Layers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub String);

impl LayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(value: &str) -> Self {
        LayerId(value.to_string())
    }
}

/// Hochgeladener Layer.
///
/// `original` bleibt nach dem Import unverändert; jede Bearbeitung schreibt
/// `processed`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    pub original: FeatureSet,
    pub processed: Option<FeatureSet>,
}

impl Layer {
    /// Neuer Layer ohne bearbeiteten Stand.
    pub fn new(id: impl Into<LayerId>, name: impl Into<String>, original: FeatureSet) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            uploaded_at: Utc::now(),
            original,
            processed: None,
        }
    }

    /// Arbeitsstand für die nächste Bearbeitung: bearbeitet, sonst Original.
    pub fn working_set(&self) -> (&FeatureSet, SourceLayer) {
        match &self.processed {
            Some(processed) => (processed, SourceLayer::Processed),
            None => (&self.original, SourceLayer::Original),
        }
    }
}

/// Speicher für Layer. Lesen und Schreiben eines Layers werden vom
/// Controller pro Layer serialisiert.
pub trait LayerStore: Send + Sync {
    /// Lädt einen Layer vollständig.
    fn load(&self, id: &LayerId) -> anyhow::Result<Layer>;
    /// Ersetzt den bearbeiteten Stand eines vorhandenen Layers.
    fn save_processed(&self, id: &LayerId, processed: &FeatureSet) -> anyhow::Result<()>;
    /// Legt einen Layer an oder überschreibt ihn.
    fn insert(&self, layer: Layer) -> anyhow::Result<()>;
}

/// Layer-Speicher im Arbeitsspeicher.
#[derive(Debug, Default)]
pub struct InMemoryLayerStore {
    layers: RwLock<HashMap<LayerId, Layer>>,
}

impl InMemoryLayerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayerStore for InMemoryLayerStore {
    fn load(&self, id: &LayerId) -> anyhow::Result<Layer> {
        let layers = self
            .layers
            .read()
            .map_err(|_| anyhow::anyhow!("Layer-Speicher gesperrt (poisoned)"))?;
        layers
            .get(id)
            .cloned()
            .with_context(|| format!("Layer {} nicht gefunden", id))
    }

    fn save_processed(&self, id: &LayerId, processed: &FeatureSet) -> anyhow::Result<()> {
        let mut layers = self
            .layers
            .write()
            .map_err(|_| anyhow::anyhow!("Layer-Speicher gesperrt (poisoned)"))?;
        let layer = layers
            .get_mut(id)
            .with_context(|| format!("Layer {} nicht gefunden", id))?;
        layer.processed = Some(processed.clone());
        Ok(())
    }

    fn insert(&self, layer: Layer) -> anyhow::Result<()> {
        let mut layers = self
            .layers
            .write()
            .map_err(|_| anyhow::anyhow!("Layer-Speicher gesperrt (poisoned)"))?;
        layers.insert(layer.id.clone(), layer);
        Ok(())
    }
}

/// Metadaten-Datei `<id>.json` des Verzeichnis-Speichers.
#[derive(Debug, Serialize, Deserialize)]
struct LayerMeta {
    id: LayerId,
    name: String,
    uploaded_at: DateTime<Utc>,
}

/// Layer-Speicher auf dem Dateisystem.
///
/// Je Layer: `<id>.json` (Metadaten), `<id>.original.geojson` und optional
/// `<id>.processed.geojson`.
#[derive(Debug, Clone)]
pub struct DirectoryLayerStore {
    root: PathBuf,
}

impl DirectoryLayerStore {
    /// Öffnet (und erstellt bei Bedarf) das Speicherverzeichnis.
    pub fn open(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Verzeichnis {} nicht anlegbar", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, id: &LayerId, suffix: &str) -> anyhow::Result<PathBuf> {
        let valid = !id.0.is_empty()
            && id
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            bail!("Ungültige Layer-ID '{}' (erlaubt: a-z, 0-9, -, _)", id);
        }
        Ok(self.root.join(format!("{}{}", id.0, suffix)))
    }

    fn read_set(path: &Path) -> anyhow::Result<FeatureSet> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("{} nicht lesbar", path.display()))?;
        parse_feature_collection(&text).with_context(|| format!("{} fehlerhaft", path.display()))
    }

    /// Schreibt über eine temporäre Datei und benennt danach um.
    fn write_atomic(path: &Path, content: &str) -> anyhow::Result<()> {
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, content)
            .with_context(|| format!("{} nicht schreibbar", tmp.display()))?;
        std::fs::rename(&tmp, path)
            .with_context(|| format!("{} nicht ersetzbar", path.display()))?;
        Ok(())
    }
}

impl LayerStore for DirectoryLayerStore {
    fn load(&self, id: &LayerId) -> anyhow::Result<Layer> {
        let meta_path = self.path(id, ".json")?;
        let meta_text = std::fs::read_to_string(&meta_path)
            .with_context(|| format!("Layer {} nicht gefunden", id))?;
        let meta: LayerMeta = serde_json::from_str(&meta_text)
            .with_context(|| format!("{} fehlerhaft", meta_path.display()))?;

        let original = Self::read_set(&self.path(id, ".original.geojson")?)?;
        let processed_path = self.path(id, ".processed.geojson")?;
        let processed = if processed_path.exists() {
            Some(Self::read_set(&processed_path)?)
        } else {
            None
        };

        Ok(Layer {
            id: meta.id,
            name: meta.name,
            uploaded_at: meta.uploaded_at,
            original,
            processed,
        })
    }

    fn save_processed(&self, id: &LayerId, processed: &FeatureSet) -> anyhow::Result<()> {
        if !self.path(id, ".json")?.exists() {
            bail!("Layer {} nicht gefunden", id);
        }
        let text = write_feature_collection(processed)?;
        Self::write_atomic(&self.path(id, ".processed.geojson")?, &text)?;
        log::debug!("Bearbeiteter Stand von Layer {} gespeichert", id);
        Ok(())
    }

    fn insert(&self, layer: Layer) -> anyhow::Result<()> {
        let meta = LayerMeta {
            id: layer.id.clone(),
            name: layer.name.clone(),
            uploaded_at: layer.uploaded_at,
        };
        Self::write_atomic(
            &self.path(&layer.id, ".original.geojson")?,
            &write_feature_collection(&layer.original)?,
        )?;

        let processed_path = self.path(&layer.id, ".processed.geojson")?;
        match &layer.processed {
            Some(processed) => {
                Self::write_atomic(&processed_path, &write_feature_collection(processed)?)?
            }
            None if processed_path.exists() => std::fs::remove_file(&processed_path)?,
            None => {}
        }

        Self::write_atomic(
            &self.path(&layer.id, ".json")?,
            &serde_json::to_string_pretty(&meta)?,
        )?;
        log::info!(
            "Layer {} ({}) gespeichert: {} Features",
            layer.id,
            layer.name,
            layer.original.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::tests::rect;
    use crate::core::Feature;

    fn sample_layer() -> Layer {
        Layer::new(
            "felder",
            "Felder Nord",
            FeatureSet::new(vec![Feature::new(rect(0.0, 0.0, 1.0, 1.0))]),
        )
    }

    #[test]
    fn working_set_prefers_processed() {
        let mut layer = sample_layer();
        assert_eq!(layer.working_set().1, SourceLayer::Original);
        layer.processed = Some(FeatureSet::default());
        let (set, source) = layer.working_set();
        assert_eq!(source, SourceLayer::Processed);
        assert!(set.is_empty());
    }

    #[test]
    fn in_memory_store_saves_processed() {
        let store = InMemoryLayerStore::new();
        store.insert(sample_layer()).expect("insert");
        let id = LayerId::from("felder");
        store
            .save_processed(&id, &FeatureSet::default())
            .expect("speichern");
        let layer = store.load(&id).expect("laden");
        assert_eq!(layer.processed, Some(FeatureSet::default()));
        assert!(store.load(&LayerId::from("fehlt")).is_err());
    }

    #[test]
    fn directory_store_roundtrips_layer() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = DirectoryLayerStore::open(dir.path()).expect("öffnen");
        let layer = sample_layer();
        store.insert(layer.clone()).expect("insert");

        let loaded = store.load(&layer.id).expect("laden");
        assert_eq!(loaded.name, "Felder Nord");
        assert_eq!(loaded.original, layer.original);
        assert!(loaded.processed.is_none());

        store
            .save_processed(&layer.id, &FeatureSet::default())
            .expect("speichern");
        let loaded = store.load(&layer.id).expect("laden");
        assert_eq!(loaded.processed, Some(FeatureSet::default()));
    }

    #[test]
    fn directory_store_rejects_path_like_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = DirectoryLayerStore::open(dir.path()).expect("öffnen");
        assert!(store.load(&LayerId::from("../etc")).is_err());
        assert!(store
            .save_processed(&LayerId::from("unbekannt"), &FeatureSet::default())
            .is_err());
    }
}
