//! Polygonale Geometrie eines Features: geschlossene Variante aus Polygon und MultiPolygon.

use geo::{Area, BoundingRect, Coord, MultiPolygon, Polygon, Rect};

/// Geometrie eines Features.
///
/// Nur flächige Geometrien sind zulässig. Vor Adjazenz- und Union-Logik wird
/// immer über [`PolygonGeometry::explode`] auf Einzelpolygone normalisiert.
#[derive(Debug, Clone, PartialEq)]
pub enum PolygonGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl PolygonGeometry {
    /// Zerlegt die Geometrie in ihre Einzelpolygone.
    pub fn explode(&self) -> Vec<Polygon<f64>> {
        match self {
            PolygonGeometry::Polygon(p) => vec![p.clone()],
            PolygonGeometry::MultiPolygon(mp) => mp.0.clone(),
        }
    }

    /// Liefert die Geometrie als MultiPolygon (Kernel-Eingabeform).
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        match self {
            PolygonGeometry::Polygon(p) => MultiPolygon::new(vec![p.clone()]),
            PolygonGeometry::MultiPolygon(mp) => mp.clone(),
        }
    }

    /// Normalisiert ein Kernel-Ergebnis: genau ein Teil wird zum `Polygon`.
    pub fn from_multi_polygon(mp: MultiPolygon<f64>) -> Self {
        if mp.0.len() == 1 {
            let mut parts = mp.0;
            match parts.pop() {
                Some(p) => PolygonGeometry::Polygon(p),
                None => PolygonGeometry::MultiPolygon(MultiPolygon::new(Vec::new())),
            }
        } else {
            PolygonGeometry::MultiPolygon(mp)
        }
    }

    /// Anzahl der Einzelpolygone.
    pub fn part_count(&self) -> usize {
        match self {
            PolygonGeometry::Polygon(_) => 1,
            PolygonGeometry::MultiPolygon(mp) => mp.0.len(),
        }
    }

    /// `true`, wenn keine Fläche beschrieben wird (kein Teil oder leere Außenringe).
    pub fn is_empty(&self) -> bool {
        self.explode().iter().all(|p| p.exterior().0.is_empty())
    }

    /// Ungerichtete Fläche in Koordinateneinheiten².
    pub fn area(&self) -> f64 {
        match self {
            PolygonGeometry::Polygon(p) => p.unsigned_area(),
            PolygonGeometry::MultiPolygon(mp) => mp.unsigned_area(),
        }
    }

    /// Achsenparallele Bounding-Box (None bei leerer Geometrie).
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            PolygonGeometry::Polygon(p) => p.bounding_rect(),
            PolygonGeometry::MultiPolygon(mp) => mp.bounding_rect(),
        }
    }

    /// `true`, wenn alle Koordinaten endlich sind.
    pub fn has_finite_coords(&self) -> bool {
        self.explode().iter().all(|p| {
            std::iter::once(p.exterior())
                .chain(p.interiors())
                .flat_map(|ring| ring.0.iter())
                .all(|c: &Coord<f64>| c.x.is_finite() && c.y.is_finite())
        })
    }

    /// GeoJSON-Typname der Variante.
    pub fn type_name(&self) -> &'static str {
        match self {
            PolygonGeometry::Polygon(_) => "Polygon",
            PolygonGeometry::MultiPolygon(_) => "MultiPolygon",
        }
    }
}

impl From<Polygon<f64>> for PolygonGeometry {
    fn from(value: Polygon<f64>) -> Self {
        PolygonGeometry::Polygon(value)
    }
}

impl From<MultiPolygon<f64>> for PolygonGeometry {
    fn from(value: MultiPolygon<f64>) -> Self {
        PolygonGeometry::MultiPolygon(value)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{polygon, LineString};

    /// Achsenparalleles Rechteck als Polygon (Testhilfe).
    pub(crate) fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1)]
    }

    #[test]
    fn explode_flattens_multi_polygon() {
        let geometry = PolygonGeometry::MultiPolygon(MultiPolygon::new(vec![
            rect(0.0, 0.0, 1.0, 1.0),
            rect(5.0, 5.0, 6.0, 6.0),
        ]));

        assert_eq!(geometry.explode().len(), 2);
        assert_eq!(geometry.part_count(), 2);
        assert_relative_eq!(geometry.area(), 2.0);
    }

    #[test]
    fn single_part_multi_polygon_is_normalized() {
        let mp = MultiPolygon::new(vec![rect(0.0, 0.0, 2.0, 1.0)]);
        let geometry = PolygonGeometry::from_multi_polygon(mp);

        assert!(matches!(geometry, PolygonGeometry::Polygon(_)));
        assert_eq!(geometry.type_name(), "Polygon");
    }

    #[test]
    fn empty_and_non_finite_detection() {
        let empty = PolygonGeometry::MultiPolygon(MultiPolygon::new(Vec::new()));
        assert!(empty.is_empty());
        assert!(empty.bounding_rect().is_none());

        let broken = PolygonGeometry::Polygon(Polygon::new(
            LineString::from(vec![(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0), (0.0, 0.0)]),
            vec![],
        ));
        assert!(!broken.has_finite_coords());
    }
}
