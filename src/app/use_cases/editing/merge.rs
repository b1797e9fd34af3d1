//! Use-Case: mehrere benachbarte Polygone zu einem Feature zusammenführen.

use crate::app::{EditContext, EditError, EditResult};
use crate::core::adjacency::are_connected_within;
use crate::core::{
    guarded, repair, resolve_selection, AttributeValue, Feature, FeatureSet, GeoKernel,
    GeometryKernel, OperationBudget, PolygonGeometry, SelectionId,
};
use crate::shared::EngineOptions;
use geo::Polygon;

/// Führt die ausgewählten Features mit dem Standard-Kernel zusammen.
pub fn merge_polygons(
    feature_set: &FeatureSet,
    selection: &[SelectionId],
    context: &EditContext,
    options: &EngineOptions,
) -> Result<EditResult, EditError> {
    merge_polygons_with(&GeoKernel, feature_set, selection, context, options)
}

/// Führt die ausgewählten Features zusammen.
///
/// Die Features an den aufgelösten Positionen werden entfernt und durch genau
/// ein neues Feature am Ende ersetzt. Alle übrigen Features behalten ihre
/// Reihenfolge. Bei jedem Fehler bleibt `feature_set` unberührt.
pub fn merge_polygons_with<K: GeometryKernel + ?Sized>(
    kernel: &K,
    feature_set: &FeatureSet,
    selection: &[SelectionId],
    context: &EditContext,
    options: &EngineOptions,
) -> Result<EditResult, EditError> {
    let selected = resolve_selection(selection, feature_set.len());
    if selected.len() < 2 {
        return Err(EditError::InsufficientSelection(format!(
            "Mindestens 2 gültige Polygone zum Zusammenführen auswählen ({} gültig)",
            selected.len()
        )));
    }

    let budget = OperationBudget::start(options.operation_timeout_ms);
    let (picked, remaining) = feature_set.partition(&selected);

    let merged = guarded(|| union_selected(kernel, &picked, &selected, &budget))
        .map_err(|panic| EditError::from_kernel_panic("Zusammenführen", panic))??;

    // Aufgelöste Positions-IDs, aufsteigend
    let merged_ids: Vec<AttributeValue> = selected
        .iter()
        .map(|position| AttributeValue::Text(position.to_string()))
        .collect();

    let area = merged.area();
    if let Some(crs) = feature_set.crs.as_ref().filter(|crs| crs.is_geographic()) {
        log::warn!(
            "Fläche in geographischem CRS {} berechnet (Einheit Grad²)",
            crs.name
        );
    }

    let feature = Feature::new(merged)
        .with_property("name", options.merged_label.as_str())
        .with_property("original_features", selected.len())
        .with_property("merged_features", AttributeValue::List(merged_ids))
        .with_property("source_layer", context.source_layer.as_str())
        .with_property("merged_at", context.timestamp)
        .with_property("area", options.scaled_area(area));

    let positions: Vec<usize> = selected.iter().copied().collect();
    log::info!(
        "{} Polygone zusammengeführt (Positionen {:?}, Fläche {:.3})",
        positions.len(),
        positions,
        area
    );

    Ok(EditResult {
        feature_set: feature_set.rebuilt(remaining, vec![feature]),
        message: format!("Polygone {:?} erfolgreich zusammengeführt", positions),
        cut_report: None,
    })
}

/// Repariert die Eingaben, prüft den Zusammenhang und vereinigt.
fn union_selected<K: GeometryKernel + ?Sized>(
    kernel: &K,
    picked: &[&Feature],
    selected: &indexmap::IndexSet<usize>,
    budget: &OperationBudget,
) -> Result<PolygonGeometry, EditError> {
    let mut pieces: Vec<Polygon<f64>> = Vec::new();
    for (&position, feature) in selected.iter().zip(picked) {
        if feature.geometry.is_empty() || !feature.geometry.has_finite_coords() {
            return Err(EditError::InvalidInputGeometry(format!(
                "Feature an Position {} hat keine verwertbare Geometrie",
                position
            )));
        }
        let usable = repair(kernel, &feature.geometry.to_multi_polygon()).map_err(|e| {
            EditError::InvalidInputGeometry(format!("Feature an Position {}: {}", position, e))
        })?;
        pieces.extend(usable.0);
    }

    if !are_connected_within(kernel, &pieces, budget).map_err(EditError::merge_timeout)? {
        return Err(EditError::NotAdjacent);
    }
    budget.check().map_err(EditError::merge_timeout)?;

    let union = kernel.union_all(&pieces);
    let union = repair(kernel, &union)
        .map_err(|e| EditError::MergeProducedEmptyGeometry(e.to_string()))?;

    Ok(PolygonGeometry::from_multi_polygon(union))
}
