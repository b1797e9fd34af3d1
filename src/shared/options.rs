//! Zentrale Konfiguration der Topologie-Engine.
//!
//! `EngineOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Merge ───────────────────────────────────────────────────────────

/// Name-Attribut des zusammengeführten Features.
pub const MERGED_LABEL: &str = "Merged Polygon";
/// Faktor von Koordinateneinheiten² auf die gewünschte Flächeneinheit (1.0 = unverändert).
pub const AREA_SCALE_FACTOR: f64 = 1.0;

// ── Cut ─────────────────────────────────────────────────────────────

/// Verlängerung der Schnittlinie je Ende, als Vielfaches der größeren Bounding-Box-Kante.
pub const LINE_EXTENSION_FACTOR: f64 = 2.0;
/// Halbe Breite des Linien-Buffers für die Fallback-Strategien (Koordinateneinheiten).
pub const CUT_BUFFER_EPSILON: f64 = 1e-6;
/// Mindestfläche eines Schnittteils (0.0 = jede positive Fläche zählt).
pub const MIN_PART_AREA: f64 = 0.0;

// ── Laufzeit ────────────────────────────────────────────────────────

/// Zeitbudget pro Operation in Millisekunden (0 = unbegrenzt).
pub const OPERATION_TIMEOUT_MS: u64 = 5_000;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Engine-Optionen.
/// Wird als `layer_topology_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    // ── Merge ───────────────────────────────────────────────────
    /// Wert des `name`-Attributs für zusammengeführte Features
    pub merged_label: String,
    /// Skalierung der berechneten Fläche (Koordinateneinheiten² → Zielgröße)
    pub area_scale_factor: f64,

    // ── Cut ─────────────────────────────────────────────────────
    /// Linienverlängerung je Ende (× größere Bounding-Box-Kante)
    pub line_extension_factor: f64,
    /// Halbe Buffer-Breite der Fallback-Strategien
    pub cut_buffer_epsilon: f64,
    /// Mindestfläche eines gültigen Schnittteils
    #[serde(default = "default_min_part_area")]
    pub min_part_area: f64,
    /// Attribute des Original-Features auf die Schnittteile übernehmen
    #[serde(default = "default_propagate_attributes_on_cut")]
    pub propagate_attributes_on_cut: bool,

    // ── Laufzeit ────────────────────────────────────────────────
    /// Zeitbudget pro Operation in Millisekunden (0 = unbegrenzt)
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            merged_label: MERGED_LABEL.to_string(),
            area_scale_factor: AREA_SCALE_FACTOR,
            line_extension_factor: LINE_EXTENSION_FACTOR,
            cut_buffer_epsilon: CUT_BUFFER_EPSILON,
            min_part_area: MIN_PART_AREA,
            propagate_attributes_on_cut: true,
            operation_timeout_ms: OPERATION_TIMEOUT_MS,
        }
    }
}

/// Serde-Default für `min_part_area` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_min_part_area() -> f64 {
    MIN_PART_AREA
}

/// Serde-Default für `propagate_attributes_on_cut`.
fn default_propagate_attributes_on_cut() -> bool {
    true
}

/// Serde-Default für `operation_timeout_ms`.
fn default_operation_timeout_ms() -> u64 {
    OPERATION_TIMEOUT_MS
}

impl EngineOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("layer_topology_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("layer_topology_editor.toml")
    }

    /// Skaliert eine Fläche in Koordinateneinheiten² auf die konfigurierte Einheit.
    pub fn scaled_area(&self, area: f64) -> f64 {
        area * self.area_scale_factor
    }
}
