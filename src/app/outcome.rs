//! Ergebnisse der Bearbeitungs-Use-Cases.

use super::error::{EditError, EditErrorKind};
use super::use_cases::editing::CutReport;
use crate::core::{FeatureSet, SourceLayer};
use chrono::{DateTime, Utc};

/// Rahmendaten einer Bearbeitung (Herkunft und Zeitstempel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditContext {
    /// Aus welchem Layer das Feature-Set gelesen wurde
    pub source_layer: SourceLayer,
    /// Zeitstempel für `merged_at`
    pub timestamp: DateTime<Utc>,
}

impl EditContext {
    pub fn new(source_layer: SourceLayer, timestamp: DateTime<Utc>) -> Self {
        Self {
            source_layer,
            timestamp,
        }
    }

    /// Kontext mit aktuellem Zeitstempel.
    pub fn now(source_layer: SourceLayer) -> Self {
        Self::new(source_layer, Utc::now())
    }
}

/// Erfolgreiches Bearbeitungsergebnis.
#[derive(Debug, Clone)]
pub struct EditResult {
    /// Vollständiges Folge-Feature-Set
    pub feature_set: FeatureSet,
    /// Meldung für den Aufrufer
    pub message: String,
    /// Ablaufprotokoll bei Cut-Operationen
    pub cut_report: Option<CutReport>,
}

/// Strukturiertes Ergebnis `(feature_set, success, message)` für Aufrufer.
///
/// Bei Fehlschlag enthält `feature_set` das unveränderte Eingabe-Set.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub feature_set: FeatureSet,
    pub success: bool,
    pub message: String,
    pub error: Option<EditErrorKind>,
}

impl EditOutcome {
    pub fn from_result(input: &FeatureSet, result: Result<EditResult, EditError>) -> Self {
        match result {
            Ok(done) => Self {
                feature_set: done.feature_set,
                success: true,
                message: done.message,
                error: None,
            },
            Err(err) => Self {
                feature_set: input.clone(),
                success: false,
                message: err.to_string(),
                error: Some(err.kind()),
            },
        }
    }
}
