//! Split-Strategien und Teil-Filter der Cut-Engine.

use crate::core::{is_usable, repair, GeometryKernel};
use geo::{Area, LineString, MultiPolygon, Polygon};
use serde::Serialize;
use std::fmt;

/// Anteil eines Teils, ab dem er als Buffer-Streifen gilt.
const STRIP_SHARE: f64 = 0.5;

/// Verfahren, mit dem ein Teilungsversuch durchgeführt wurde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CutStrategy {
    /// Split entlang der Linie selbst
    DirectSplit,
    /// Split entlang der Ränder des Linien-Buffers, Streifen verworfen
    BufferedSplit,
    /// Ziel minus Linien-Buffer
    BufferedDifference,
}

impl CutStrategy {
    /// Reihenfolge der Ausweichstrategien nach dem direkten Split.
    pub const FALLBACKS: [CutStrategy; 2] =
        [CutStrategy::BufferedSplit, CutStrategy::BufferedDifference];

    pub fn as_str(self) -> &'static str {
        match self {
            CutStrategy::DirectSplit => "direct-split",
            CutStrategy::BufferedSplit => "buffered-split",
            CutStrategy::BufferedDifference => "buffered-difference",
        }
    }

    /// Erzeugt Kandidaten-Teile (ungefiltert).
    pub(super) fn apply<K: GeometryKernel + ?Sized>(
        self,
        kernel: &K,
        target: &Polygon<f64>,
        line: &LineString<f64>,
        epsilon: f64,
    ) -> Vec<Polygon<f64>> {
        match self {
            CutStrategy::DirectSplit => kernel.split(target, std::slice::from_ref(line)),
            CutStrategy::BufferedSplit => buffered_split(kernel, target, line, epsilon),
            CutStrategy::BufferedDifference => {
                let strip = kernel.buffer_line(line, epsilon);
                if strip.0.is_empty() {
                    return Vec::new();
                }
                kernel.difference(target, &strip).0
            }
        }
    }
}

impl fmt::Display for CutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Teilt entlang der Buffer-Ränder und verwirft die Teile, die überwiegend im Streifen liegen.
fn buffered_split<K: GeometryKernel + ?Sized>(
    kernel: &K,
    target: &Polygon<f64>,
    line: &LineString<f64>,
    epsilon: f64,
) -> Vec<Polygon<f64>> {
    let strip = kernel.buffer_line(line, epsilon);
    let edges: Vec<LineString<f64>> = strip
        .0
        .iter()
        .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
        .cloned()
        .collect();
    if edges.is_empty() {
        return Vec::new();
    }

    kernel
        .split(target, &edges)
        .into_iter()
        .filter(|part| {
            let area = part.unsigned_area();
            let in_strip: f64 = strip
                .0
                .iter()
                .map(|s| kernel.intersection_area(part, s))
                .sum();
            in_strip < STRIP_SHARE * area
        })
        .collect()
}

/// Repariert jeden Kandidaten einzeln; nicht reparierbare fallen weg.
pub(super) fn repair_parts<K: GeometryKernel + ?Sized>(
    kernel: &K,
    candidates: Vec<Polygon<f64>>,
) -> Vec<Polygon<f64>> {
    candidates
        .into_iter()
        .flat_map(|part| match repair(kernel, &MultiPolygon::new(vec![part])) {
            Ok(repaired) => repaired.0,
            Err(e) => {
                log::debug!("Schnittteil verworfen: {}", e);
                Vec::new()
            }
        })
        .collect()
}

/// Behält nur gültige Teile mit Fläche über `min_area`.
pub(super) fn usable_parts<K: GeometryKernel + ?Sized>(
    kernel: &K,
    candidates: &[Polygon<f64>],
    min_area: f64,
) -> Vec<Polygon<f64>> {
    candidates
        .iter()
        .filter(|part| {
            part.unsigned_area() > min_area
                && is_usable(kernel, &MultiPolygon::new(vec![(*part).clone()]))
        })
        .cloned()
        .collect()
}
