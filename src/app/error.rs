//! Fehlerarten der Bearbeitungs-Use-Cases (Merge/Cut).

use crate::core::{BudgetExhausted, KernelPanic, Unrepairable};
use serde::{Deserialize, Serialize};

/// Fehler einer Merge- oder Cut-Operation. Keiner davon ist prozessfatal;
/// das Feature-Set bleibt bei jedem Fehler unverändert.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// Selektion löst zu weniger als 2 gültigen IDs auf bzw. Cut-Ziel fehlt
    #[error("{0}")]
    InsufficientSelection(String),
    /// Merge-Kandidaten bilden keine zusammenhängende Komponente
    #[error("Ausgewählte Polygone sind nicht benachbart/berühren sich nicht")]
    NotAdjacent,
    #[error("Zusammenführen ergab keine gültige Geometrie: {0}")]
    MergeProducedEmptyGeometry(String),
    #[error("Schnitt ergab {parts} gültige(s) Teil(e), mindestens 2 nötig (versucht: {attempted})")]
    CutProducedInsufficientParts { parts: usize, attempted: String },
    /// Intern; wird normalerweise in eine der obigen Arten übersetzt
    #[error(transparent)]
    Unrepairable(#[from] Unrepairable),
    #[error("Ungültige Eingabegeometrie: {0}")]
    InvalidInputGeometry(String),
}

/// Fehlerart ohne Details, für strukturierte Ergebnisse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditErrorKind {
    InsufficientSelection,
    NotAdjacent,
    MergeProducedEmptyGeometry,
    CutProducedInsufficientParts,
    Unrepairable,
    InvalidInputGeometry,
}

impl EditError {
    pub fn kind(&self) -> EditErrorKind {
        match self {
            EditError::InsufficientSelection(_) => EditErrorKind::InsufficientSelection,
            EditError::NotAdjacent => EditErrorKind::NotAdjacent,
            EditError::MergeProducedEmptyGeometry(_) => EditErrorKind::MergeProducedEmptyGeometry,
            EditError::CutProducedInsufficientParts { .. } => {
                EditErrorKind::CutProducedInsufficientParts
            }
            EditError::Unrepairable(_) => EditErrorKind::Unrepairable,
            EditError::InvalidInputGeometry(_) => EditErrorKind::InvalidInputGeometry,
        }
    }

    /// Übersetzt einen abgefangenen Kernel-Abbruch an der Engine-Grenze.
    pub(crate) fn from_kernel_panic(operation: &str, panic: KernelPanic) -> Self {
        EditError::InvalidInputGeometry(format!(
            "Kernel-Fehler beim {}: {}",
            operation, panic.message
        ))
    }

    pub(crate) fn merge_timeout(exhausted: BudgetExhausted) -> Self {
        EditError::MergeProducedEmptyGeometry(exhausted.to_string())
    }
}
