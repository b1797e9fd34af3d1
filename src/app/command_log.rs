//! Protokoll ausgeführter Bearbeitungs-Commands.

use super::EditCommand;
use chrono::{DateTime, Utc};

/// Eintrag im Command-Log.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandLogEntry {
    pub command: EditCommand,
    pub recorded_at: DateTime<Utc>,
    pub success: bool,
}

/// Speichert ausgeführte Commands in Reihenfolge.
#[derive(Debug, Default)]
pub struct CommandLog {
    entries: Vec<CommandLogEntry>,
}

impl CommandLog {
    const MAX_ENTRIES: usize = 1000;

    /// Erstellt ein leeres Command-Log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Fügt einen ausgeführten Command hinzu.
    /// Begrenzt auf MAX_ENTRIES, ältere Einträge werden verworfen.
    pub fn record(&mut self, command: EditCommand, success: bool) {
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.drain(..Self::MAX_ENTRIES / 2);
        }
        self.entries.push(CommandLogEntry {
            command,
            recorded_at: Utc::now(),
            success,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Liefert eine read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[CommandLogEntry] {
        &self.entries
    }
}
