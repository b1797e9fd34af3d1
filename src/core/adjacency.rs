//! Adjazenz-Erkennung: bilden die Polygone genau eine Zusammenhangskomponente?
//!
//! Kanten entstehen zwischen zwei Polygonen, wenn `touches`, `intersects`,
//! `overlaps` oder eine Schnittfläche > 0 zutrifft. Kandidatenpaare kommen aus
//! dem Bounding-Box-Index, die Komponenten aus einem Union-Find.

use super::budget::{BudgetExhausted, OperationBudget};
use super::{EnvelopeIndex, GeometryKernel};
use geo::Polygon;

/// Union-Find mit Pfadkompression und Größen-Heuristik.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
    components: usize,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
            components: len,
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while x != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    fn union(&mut self, x: usize, y: usize) {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return;
        }
        let (small, large) = if self.size[rx] < self.size[ry] {
            (rx, ry)
        } else {
            (ry, rx)
        };
        self.parent[small] = large;
        self.size[large] += self.size[small];
        self.components -= 1;
    }
}

/// Adjazenz-Relation zweier Polygone (Reihenfolge: billig vor teuer).
pub fn polygons_adjacent<K: GeometryKernel + ?Sized>(
    kernel: &K,
    a: &Polygon<f64>,
    b: &Polygon<f64>,
) -> bool {
    kernel.touches(a, b)
        || kernel.intersects(a, b)
        || kernel.overlaps(a, b)
        || kernel.intersection_area(a, b) > 0.0
}

/// `true`, wenn die (bereits zerlegten) Polygone genau eine Komponente bilden.
///
/// Weniger als zwei Polygone ergeben `false`.
pub fn are_connected<K: GeometryKernel + ?Sized>(kernel: &K, polygons: &[Polygon<f64>]) -> bool {
    are_connected_within(kernel, polygons, &OperationBudget::unlimited()).unwrap_or(false)
}

/// Wie [`are_connected`], prüft aber das Budget zwischen den Paartests.
pub fn are_connected_within<K: GeometryKernel + ?Sized>(
    kernel: &K,
    polygons: &[Polygon<f64>],
    budget: &OperationBudget,
) -> Result<bool, BudgetExhausted> {
    if polygons.len() < 2 {
        return Ok(false);
    }

    let index = EnvelopeIndex::from_polygons(polygons);
    if index.len() < polygons.len() {
        // Leeres Polygon ohne Box kann keine Kante haben
        return Ok(false);
    }

    let mut sets = DisjointSet::new(polygons.len());
    for (i, j) in index.candidate_pairs() {
        if sets.components == 1 {
            break;
        }
        if sets.find(i) == sets.find(j) {
            continue;
        }
        budget.check()?;
        if polygons_adjacent(kernel, &polygons[i], &polygons[j]) {
            sets.union(i, j);
        }
    }

    log::debug!(
        "Adjazenz: {} Polygone, {} Komponente(n)",
        polygons.len(),
        sets.components
    );
    Ok(sets.components == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::tests::rect;
    use crate::core::GeoKernel;
    use geo::polygon;

    #[test]
    fn fewer_than_two_polygons_are_not_connected() {
        assert!(!are_connected(&GeoKernel, &[]));
        assert!(!are_connected(&GeoKernel, &[rect(0.0, 0.0, 1.0, 1.0)]));
    }

    #[test]
    fn chain_of_touching_squares_is_connected() {
        let polygons = vec![
            rect(2.0, 0.0, 3.0, 1.0),
            rect(0.0, 0.0, 1.0, 1.0),
            rect(1.0, 0.0, 2.0, 1.0),
        ];
        assert!(are_connected(&GeoKernel, &polygons));
    }

    #[test]
    fn corner_touch_counts_as_adjacent() {
        let polygons = vec![rect(0.0, 0.0, 1.0, 1.0), rect(1.0, 1.0, 2.0, 2.0)];
        assert!(are_connected(&GeoKernel, &polygons));
    }

    #[test]
    fn overlapping_squares_are_connected() {
        let polygons = vec![rect(0.0, 0.0, 2.0, 2.0), rect(1.0, 1.0, 3.0, 3.0)];
        assert!(are_connected(&GeoKernel, &polygons));
    }

    #[test]
    fn two_separate_clusters_are_not_connected() {
        let polygons = vec![
            rect(0.0, 0.0, 1.0, 1.0),
            rect(1.0, 0.0, 2.0, 1.0),
            rect(5.0, 0.0, 6.0, 1.0),
            rect(6.0, 0.0, 7.0, 1.0),
        ];
        assert!(!are_connected(&GeoKernel, &polygons));
    }

    #[test]
    fn overlapping_boxes_without_contact_are_not_connected() {
        // Box des Dreiecks enthält das Quadrat, die Flächen berühren sich nicht
        let triangle = polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 0.0, y: 4.0)];
        let polygons = vec![triangle, rect(3.0, 3.0, 4.0, 4.0)];
        assert!(!are_connected(&GeoKernel, &polygons));
    }

    #[test]
    fn exhausted_budget_is_reported() {
        let polygons = vec![rect(0.0, 0.0, 1.0, 1.0), rect(1.0, 0.0, 2.0, 1.0)];
        let result = are_connected_within(&GeoKernel, &polygons, &OperationBudget::expired());
        assert!(result.is_err());
    }
}
