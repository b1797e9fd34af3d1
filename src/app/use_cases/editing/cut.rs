//! Use-Case: ein Polygon entlang einer Polylinie in mehrere Teile schneiden.
//!
//! Ablauf je Polygon-Bestandteil des Ziels:
//! direkter Split → Teile reparieren → Ziel reparieren und erneut teilen →
//! Buffer-Split → Buffer-Differenz. Der erste Versuch mit mindestens zwei
//! gültigen Teilen gewinnt.

mod line;
mod strategy;

pub use strategy::CutStrategy;

use crate::app::{EditError, EditResult};
use crate::core::{
    guarded, repair, resolve_target, Feature, FeatureSet, GeoKernel, GeometryKernel,
    OperationBudget, PolygonGeometry, SelectionId,
};
use crate::shared::EngineOptions;
use geo::{Area, Coord, LineString, MultiPolygon, Polygon};
use indexmap::IndexSet;
use serde::Serialize;
use strategy::{repair_parts, usable_parts};

/// Zustände eines Cut-Ablaufs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "strategy", rename_all = "kebab-case")]
pub enum CutState {
    Validated,
    LineExtended,
    SplitAttempted(CutStrategy),
    Repaired,
    Retried,
    Succeeded,
    Failed,
}

/// Protokoll eines Cut-Ablaufs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CutReport {
    /// Durchlaufene Zustände in Reihenfolge
    pub states: Vec<CutState>,
    /// Strategie des erfolgreichen Versuchs
    pub strategy: Option<CutStrategy>,
    /// Erfolgreicher Versuch lief über eine Reparatur
    pub repaired: bool,
    /// Anzahl der erzeugten Teile
    pub parts: usize,
    /// Abbruch wegen Zeitbudget
    pub budget_exhausted: bool,
}

impl CutReport {
    fn enter(&mut self, state: CutState) {
        log::debug!("Cut-Zustand: {:?}", state);
        self.states.push(state);
    }

    pub fn succeeded(&self) -> bool {
        self.states.last() == Some(&CutState::Succeeded)
    }

    /// Versuchte Strategien in Reihenfolge, ohne Wiederholungen.
    pub fn attempted(&self) -> Vec<CutStrategy> {
        let mut seen = IndexSet::new();
        for state in &self.states {
            if let CutState::SplitAttempted(strategy) = state {
                seen.insert(*strategy);
            }
        }
        seen.into_iter().collect()
    }

    fn attempted_summary(&self) -> String {
        let mut summary = self
            .attempted()
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        if self.budget_exhausted {
            summary.push_str("; Zeitbudget überschritten");
        }
        summary
    }
}

/// Schneidet das Ziel-Feature mit dem Standard-Kernel.
pub fn cut_polygon(
    feature_set: &FeatureSet,
    target: &SelectionId,
    cut_line: &[[f64; 2]],
    options: &EngineOptions,
) -> Result<EditResult, EditError> {
    cut_polygon_with(&GeoKernel, feature_set, target, cut_line, options)
}

/// Schneidet das Ziel-Feature entlang `cut_line`.
///
/// Das Ziel wird entfernt, die Teile werden am Ende angehängt. Jeder Teil trägt
/// `part_index` (ab 1), `original_feature` und `area`. Bei Fehlschlag bleibt
/// `feature_set` unberührt.
pub fn cut_polygon_with<K: GeometryKernel + ?Sized>(
    kernel: &K,
    feature_set: &FeatureSet,
    target: &SelectionId,
    cut_line: &[[f64; 2]],
    options: &EngineOptions,
) -> Result<EditResult, EditError> {
    let Some((position, feature)) = resolve_target(target, feature_set.len())
        .and_then(|position| feature_set.get(position).map(|f| (position, f)))
    else {
        return Err(EditError::InsufficientSelection(format!(
            "Ziel-Polygon {} existiert nicht ({} Features)",
            target,
            feature_set.len()
        )));
    };

    if cut_line.len() < 2 {
        return Err(EditError::InvalidInputGeometry(
            "Schnittlinie benötigt mindestens 2 Punkte".into(),
        ));
    }
    if !cut_line.iter().flatten().all(|v| v.is_finite()) {
        return Err(EditError::InvalidInputGeometry(
            "Schnittlinie enthält nicht-endliche Koordinaten".into(),
        ));
    }
    if feature.geometry.is_empty() || !feature.geometry.has_finite_coords() {
        return Err(EditError::InvalidInputGeometry(format!(
            "Feature an Position {} hat keine verwertbare Geometrie",
            position
        )));
    }

    let budget = OperationBudget::start(options.operation_timeout_ms);
    let points: Vec<Coord<f64>> = cut_line.iter().map(|&[x, y]| Coord { x, y }).collect();
    let (parts, report) = guarded(|| run_cut(kernel, &feature.geometry, &points, options, &budget))
        .map_err(|panic| EditError::from_kernel_panic("Schneiden", panic))?;

    if !report.succeeded() {
        log::warn!(
            "Schneiden von Position {} fehlgeschlagen: {} Teil(e), versucht: {}",
            position,
            parts.len(),
            report.attempted_summary()
        );
        return Err(EditError::CutProducedInsufficientParts {
            parts: parts.len(),
            attempted: report.attempted_summary(),
        });
    }

    if let Some(crs) = feature_set.crs.as_ref().filter(|crs| crs.is_geographic()) {
        log::warn!(
            "Flächen in geographischem CRS {} berechnet (Einheit Grad²)",
            crs.name
        );
    }

    let original_id = feature.identifier(position);
    let part_count = parts.len();
    let part_features: Vec<Feature> = parts
        .into_iter()
        .enumerate()
        .map(|(index, polygon)| {
            let area = polygon.unsigned_area();
            let mut part = Feature::new(polygon);
            if options.propagate_attributes_on_cut {
                part.properties = feature.properties.clone();
            }
            part.with_property("part_index", index + 1)
                .with_property("original_feature", original_id.as_str())
                .with_property("area", options.scaled_area(area))
        })
        .collect();

    let selected: IndexSet<usize> = std::iter::once(position).collect();
    let (_, remaining) = feature_set.partition(&selected);

    log::info!(
        "Polygon an Position {} in {} Teile geschnitten ({})",
        position,
        part_count,
        report.strategy.map_or("?", CutStrategy::as_str)
    );

    Ok(EditResult {
        feature_set: feature_set.rebuilt(remaining, part_features),
        message: format!(
            "Polygon {} erfolgreich in {} Teile geschnitten",
            position, part_count
        ),
        cut_report: Some(report),
    })
}

/// Zustandsautomat über alle Bestandteile des Ziels.
fn run_cut<K: GeometryKernel + ?Sized>(
    kernel: &K,
    geometry: &PolygonGeometry,
    points: &[Coord<f64>],
    options: &EngineOptions,
    budget: &OperationBudget,
) -> (Vec<Polygon<f64>>, CutReport) {
    let mut report = CutReport::default();
    report.enter(CutState::Validated);

    let Some(bounds) = geometry.bounding_rect() else {
        report.enter(CutState::Failed);
        return (Vec::new(), report);
    };
    let line = line::extend_cut_line(points, &bounds, options.line_extension_factor);
    report.enter(CutState::LineExtended);

    let mut parts = Vec::new();
    let mut divided = false;
    for polygon in geometry.explode() {
        match split_polygon(kernel, &polygon, &line, options, budget, &mut report) {
            Some(pieces) => {
                divided = true;
                parts.extend(pieces);
            }
            None => {
                // Nicht getroffener Bestandteil bleibt als eigener Teil erhalten
                let kept = repair_parts(kernel, vec![polygon]);
                parts.extend(usable_parts(kernel, &kept, options.min_part_area));
            }
        }
    }

    if divided && parts.len() >= 2 {
        report.parts = parts.len();
        report.enter(CutState::Succeeded);
    } else {
        report.enter(CutState::Failed);
    }
    (parts, report)
}

/// Strategiekette für ein einzelnes Polygon. `None`, wenn keine Strategie
/// mindestens zwei gültige Teile liefert.
fn split_polygon<K: GeometryKernel + ?Sized>(
    kernel: &K,
    polygon: &Polygon<f64>,
    line: &LineString<f64>,
    options: &EngineOptions,
    budget: &OperationBudget,
    report: &mut CutReport,
) -> Option<Vec<Polygon<f64>>> {
    let min_area = options.min_part_area;
    let epsilon = options.cut_buffer_epsilon;

    report.enter(CutState::SplitAttempted(CutStrategy::DirectSplit));
    let candidates = CutStrategy::DirectSplit.apply(kernel, polygon, line, epsilon);
    let parts = usable_parts(kernel, &candidates, min_area);
    if parts.len() >= 2 {
        report.strategy = Some(CutStrategy::DirectSplit);
        return Some(parts);
    }

    if exhausted(budget, report) {
        return None;
    }
    report.enter(CutState::Repaired);
    let parts = usable_parts(kernel, &repair_parts(kernel, candidates), min_area);
    report.enter(CutState::Retried);
    if parts.len() >= 2 {
        report.strategy = Some(CutStrategy::DirectSplit);
        report.repaired = true;
        return Some(parts);
    }

    // Ziel selbst reparieren; Ausweichstrategien arbeiten auf dem Ergebnis
    let targets = match repair(kernel, &MultiPolygon::new(vec![polygon.clone()])) {
        Ok(repaired) => {
            if exhausted(budget, report) {
                return None;
            }
            report.enter(CutState::Repaired);
            let candidates: Vec<Polygon<f64>> = repaired
                .0
                .iter()
                .flat_map(|p| CutStrategy::DirectSplit.apply(kernel, p, line, epsilon))
                .collect();
            let parts = usable_parts(kernel, &repair_parts(kernel, candidates), min_area);
            report.enter(CutState::Retried);
            if parts.len() >= 2 {
                report.strategy = Some(CutStrategy::DirectSplit);
                report.repaired = true;
                return Some(parts);
            }
            repaired.0
        }
        Err(e) => {
            log::debug!("Schnittziel nicht reparierbar: {}", e);
            vec![polygon.clone()]
        }
    };

    for strategy in CutStrategy::FALLBACKS {
        if exhausted(budget, report) {
            return None;
        }
        report.enter(CutState::SplitAttempted(strategy));
        let candidates: Vec<Polygon<f64>> = targets
            .iter()
            .flat_map(|p| strategy.apply(kernel, p, line, epsilon))
            .collect();
        let parts = usable_parts(kernel, &repair_parts(kernel, candidates), min_area);
        if parts.len() >= 2 {
            log::debug!("Schnitt über Ausweichstrategie {}", strategy);
            report.strategy = Some(strategy);
            return Some(parts);
        }
    }
    None
}

fn exhausted(budget: &OperationBudget, report: &mut CutReport) -> bool {
    if budget.is_exhausted() {
        report.budget_exhausted = true;
    }
    report.budget_exhausted
}
