//! Spatial-Index (R-Tree über Bounding-Boxen) für schnelle Kandidatenpaare.

use geo::{BoundingRect, Polygon};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, RTreeObject};

type IndexedEnvelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// Read-only Index über die Bounding-Boxen einer Polygonliste.
#[derive(Debug, Clone)]
pub struct EnvelopeIndex {
    tree: RTree<IndexedEnvelope>,
    len: usize,
}

impl EnvelopeIndex {
    /// Baut den Index; Polygone ohne Bounding-Box (leer) werden übersprungen.
    pub fn from_polygons(polygons: &[Polygon<f64>]) -> Self {
        let entries: Vec<IndexedEnvelope> = polygons
            .iter()
            .enumerate()
            .filter_map(|(i, polygon)| {
                let rect = polygon.bounding_rect()?;
                Some(GeomWithData::new(
                    Rectangle::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                    i,
                ))
            })
            .collect();

        Self {
            len: entries.len(),
            tree: RTree::bulk_load(entries),
        }
    }

    /// Gibt die Anzahl indexierter Polygone zurück.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Gibt `true` zurück, wenn keine Polygone im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Alle Paare `(i, j)` mit `i < j`, deren Boxen sich schneiden oder berühren.
    ///
    /// Paare mit disjunkten Boxen können kein Adjazenz-Prädikat erfüllen.
    pub fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for entry in self.tree.iter() {
            let envelope = entry.geom().envelope();
            for other in self.tree.locate_in_envelope_intersecting(&envelope) {
                if entry.data < other.data {
                    pairs.push((entry.data, other.data));
                }
            }
        }
        pairs.sort_unstable();
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::tests::rect;

    fn sample_polygons() -> Vec<Polygon<f64>> {
        vec![
            rect(0.0, 0.0, 1.0, 1.0),
            rect(1.0, 0.0, 2.0, 1.0),
            rect(10.0, 10.0, 11.0, 11.0),
        ]
    }

    #[test]
    fn touching_boxes_form_candidate_pair() {
        let index = EnvelopeIndex::from_polygons(&sample_polygons());

        assert_eq!(index.len(), 3);
        assert_eq!(index.candidate_pairs(), vec![(0, 1)]);
    }

    #[test]
    fn empty_index_has_no_entries() {
        let index = EnvelopeIndex::from_polygons(&[]);

        assert!(index.is_empty());
        assert!(index.candidate_pairs().is_empty());
    }
}
