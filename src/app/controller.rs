//! Controller für Bearbeitungen auf gespeicherten Layern.

use super::use_cases::editing::{cut_polygon_with, merge_polygons_with};
use super::{
    CommandLog, CommandLogEntry, EditCommand, EditContext, EditOutcome, LayerLocks, LayerStore,
};
use crate::core::{GeoKernel, GeometryKernel};
use crate::shared::EngineOptions;
use std::sync::{Mutex, PoisonError};

/// Führt Commands als gesperrtes Lesen-Ändern-Schreiben auf einem Layer aus.
///
/// Fachliche Fehler (z. B. nicht benachbarte Polygone) landen im
/// [`EditOutcome`], Speicherfehler als `Err`.
pub struct LayerEditController<S: LayerStore, K: GeometryKernel = GeoKernel> {
    store: S,
    kernel: K,
    options: EngineOptions,
    locks: LayerLocks,
    command_log: Mutex<CommandLog>,
}

impl<S: LayerStore> LayerEditController<S> {
    /// Erstellt einen Controller mit dem Standard-Kernel.
    pub fn new(store: S, options: EngineOptions) -> Self {
        Self::with_kernel(store, GeoKernel, options)
    }
}

impl<S: LayerStore, K: GeometryKernel + Sync> LayerEditController<S, K> {
    pub fn with_kernel(store: S, kernel: K, options: EngineOptions) -> Self {
        Self {
            store,
            kernel,
            options,
            locks: LayerLocks::new(),
            command_log: Mutex::new(CommandLog::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Führt einen Command aus und speichert bei Erfolg den bearbeiteten Stand.
    pub fn handle_command(&self, command: EditCommand) -> anyhow::Result<EditOutcome> {
        let layer_id = command.layer().clone();
        let outcome = self.locks.with_layer(&layer_id, || -> anyhow::Result<EditOutcome> {
            let layer = self.store.load(&layer_id)?;
            let (working, source) = layer.working_set();

            let result = match &command {
                EditCommand::Merge { selection, .. } => merge_polygons_with(
                    &self.kernel,
                    working,
                    selection,
                    &EditContext::now(source),
                    &self.options,
                ),
                EditCommand::Cut { target, line, .. } => {
                    cut_polygon_with(&self.kernel, working, target, line, &self.options)
                }
            };

            let outcome = EditOutcome::from_result(working, result);
            if outcome.success {
                self.store.save_processed(&layer_id, &outcome.feature_set)?;
            }
            Ok(outcome)
        })?;

        if outcome.success {
            log::info!("{} auf Layer {}: {}", command.name(), layer_id, outcome.message);
        } else {
            log::warn!(
                "{} auf Layer {} fehlgeschlagen: {}",
                command.name(),
                layer_id,
                outcome.message
            );
        }

        self.command_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(command, outcome.success);
        Ok(outcome)
    }

    /// Kopie der bisher protokollierten Commands.
    pub fn command_history(&self) -> Vec<CommandLogEntry> {
        self.command_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries()
            .to_vec()
    }
}
