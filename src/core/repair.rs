//! Geometrie-Reparatur: einzige Stelle, an der pathologische Geometrien aufgefangen werden.

use super::GeometryKernel;
use geo::{Area, MultiPolygon};

/// Geometrie ließ sich nicht in eine gültige, nicht-leere Fläche überführen.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Geometrie nicht reparierbar ({parts} Teile, Fläche {area})")]
pub struct Unrepairable {
    pub parts: usize,
    pub area: f64,
}

/// `true`, wenn die Geometrie gültig ist und positive Fläche besitzt.
pub fn is_usable<K: GeometryKernel + ?Sized>(kernel: &K, geometry: &MultiPolygon<f64>) -> bool {
    !geometry.0.is_empty() && geometry.unsigned_area() > 0.0 && kernel.is_valid(geometry)
}

/// Repariert eine Geometrie per Null-Buffer.
///
/// Bereits nutzbare Geometrien werden unverändert zurückgegeben.
pub fn repair<K: GeometryKernel + ?Sized>(
    kernel: &K,
    geometry: &MultiPolygon<f64>,
) -> Result<MultiPolygon<f64>, Unrepairable> {
    if is_usable(kernel, geometry) {
        return Ok(geometry.clone());
    }

    let repaired = kernel.buffer_zero(geometry);
    if is_usable(kernel, &repaired) {
        log::debug!(
            "Geometrie repariert: {} -> {} Teile",
            geometry.0.len(),
            repaired.0.len()
        );
        Ok(repaired)
    } else {
        Err(Unrepairable {
            parts: repaired.0.len(),
            area: repaired.unsigned_area(),
        })
    }
}
