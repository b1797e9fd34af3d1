//! Bearbeitungs-Commands für den Controller-Datenfluss.

use super::LayerId;
use crate::core::SelectionId;
use serde::{Deserialize, Serialize};

/// Mutierender Command auf einem Layer.
///
/// Positions-IDs beziehen sich auf das Feature-Set, das der Controller zum
/// Ausführungszeitpunkt lädt (bearbeiteter Layer, sonst Original).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    /// Ausgewählte Polygone zusammenführen
    Merge {
        layer: LayerId,
        selection: Vec<SelectionId>,
    },
    /// Ziel-Polygon entlang einer Polylinie schneiden
    Cut {
        layer: LayerId,
        target: SelectionId,
        line: Vec<[f64; 2]>,
    },
}

impl EditCommand {
    /// Layer, auf den sich der Command bezieht.
    pub fn layer(&self) -> &LayerId {
        match self {
            EditCommand::Merge { layer, .. } | EditCommand::Cut { layer, .. } => layer,
        }
    }

    /// Kurzname für Logs.
    pub fn name(&self) -> &'static str {
        match self {
            EditCommand::Merge { .. } => "merge",
            EditCommand::Cut { .. } => "cut",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_from_json() {
        let json = r#"{"op": "merge", "layer": "felder", "selection": [0, "3", 4]}"#;
        let command: EditCommand = serde_json::from_str(json).expect("gültiger Command");
        assert_eq!(command.name(), "merge");
        assert_eq!(command.layer(), &LayerId::from("felder"));
        match command {
            EditCommand::Merge { selection, .. } => assert_eq!(selection.len(), 3),
            other => panic!("unerwartet: {:?}", other),
        }
    }

    #[test]
    fn cut_command_roundtrips_line() {
        let command = EditCommand::Cut {
            layer: LayerId::from("felder"),
            target: SelectionId::from(2usize),
            line: vec![[0.0, 1.5], [4.0, 1.5]],
        };
        let text = serde_json::to_string(&command).expect("serialisierbar");
        assert!(text.contains("\"op\":\"cut\""));
        let back: EditCommand = serde_json::from_str(&text).expect("parsebar");
        assert_eq!(back, command);
    }
}
