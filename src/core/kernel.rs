//! Geometrie-Kernel: Schnittstelle zu den externen Primitiven (Prädikate, Union,
//! Differenz, Validierung, Buffer, Linien-Split).
//!
//! Die Engines rufen ausschließlich über [`GeometryKernel`] auf. `GeoKernel`
//! delegiert an `geo` (Relate, BooleanOps, Validation, Buffer) und für
//! Linien-Split und Reparatur direkt an `i_overlay`.

use geo::{
    unary_union, Area, BooleanOps, Buffer, Intersects, LineString, MultiPolygon, Polygon, Relate,
    Validation,
};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::float::simplify::SimplifyShape;
use i_overlay::float::slice::FloatSlice;
use std::panic::{self, AssertUnwindSafe};

/// Primitive, die von Adjazenz-, Merge- und Cut-Logik orchestriert werden.
pub trait GeometryKernel {
    /// Ränder berühren sich, Inneres ist disjunkt.
    fn touches(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> bool;
    /// Beliebiger gemeinsamer Punkt.
    fn intersects(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> bool;
    /// Teilweise Überlappung der Flächen.
    fn overlaps(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> bool;
    /// Fläche des Schnitts.
    fn intersection_area(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> f64;
    /// Vereinigung aller Polygone in einem Durchgang.
    fn union_all(&self, polygons: &[Polygon<f64>]) -> MultiPolygon<f64>;
    /// `a` minus `b`.
    fn difference(&self, a: &Polygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64>;
    /// Topologische Gültigkeit.
    fn is_valid(&self, geometry: &MultiPolygon<f64>) -> bool;
    /// Null-Breiten-Reparatur (Auflösen von Selbstüberschneidungen).
    fn buffer_zero(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64>;
    /// Linie zu einem Streifen der halben Breite `distance` aufweiten.
    fn buffer_line(&self, line: &LineString<f64>, distance: f64) -> MultiPolygon<f64>;
    /// Polygon entlang offener Linien zerteilen.
    fn split(&self, polygon: &Polygon<f64>, lines: &[LineString<f64>]) -> Vec<Polygon<f64>>;
}

/// Produktiver Kernel auf Basis von `geo` und `i_overlay`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoKernel;

impl GeometryKernel for GeoKernel {
    fn touches(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
        a.relate(b).is_touches()
    }

    fn intersects(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
        a.intersects(b)
    }

    fn overlaps(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
        a.relate(b).is_overlaps()
    }

    fn intersection_area(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> f64 {
        a.intersection(b).unsigned_area()
    }

    fn union_all(&self, polygons: &[Polygon<f64>]) -> MultiPolygon<f64> {
        unary_union(polygons.iter())
    }

    fn difference(&self, a: &Polygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        a.difference(b)
    }

    fn is_valid(&self, geometry: &MultiPolygon<f64>) -> bool {
        geometry.is_valid()
    }

    fn buffer_zero(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        // Jedes Polygon einzeln nach Even-Odd auflösen (beide Schleifen einer
        // Acht bleiben erhalten), danach Überlappungen vereinigen
        let resolved: Vec<Polygon<f64>> = geometry
            .0
            .iter()
            .flat_map(|polygon| {
                let shape = to_shape(polygon);
                if shape.is_empty() {
                    return Vec::new();
                }
                from_shapes(shape.simplify_shape(FillRule::EvenOdd))
            })
            .collect();
        unary_union(resolved.iter())
    }

    fn buffer_line(&self, line: &LineString<f64>, distance: f64) -> MultiPolygon<f64> {
        line.buffer(distance)
    }

    fn split(&self, polygon: &Polygon<f64>, lines: &[LineString<f64>]) -> Vec<Polygon<f64>> {
        let shape = to_shape(polygon);
        if shape.is_empty() {
            return Vec::new();
        }

        let splitters: Vec<Vec<[f64; 2]>> = lines
            .iter()
            .map(|line| line.coords().map(|c| [c.x, c.y]).collect())
            .collect();

        from_shapes(shape.slice_by(&splitters, FillRule::EvenOdd))
    }
}

/// Polygon als i_overlay-Shape (Außenring plus Löcher, offene Konturen).
fn to_shape(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(to_open_contour)
        .filter(|contour| contour.len() >= 3)
        .collect()
}

/// i_overlay-Shapes zurück in geo-Polygone; der erste Ring ist jeweils außen.
fn from_shapes(shapes: Vec<Vec<Vec<[f64; 2]>>>) -> Vec<Polygon<f64>> {
    shapes
        .into_iter()
        .filter_map(|rings| {
            let mut rings = rings.into_iter().map(LineString::from);
            let exterior = rings.next()?;
            Some(Polygon::new(exterior, rings.collect()))
        })
        .collect()
}

/// geo-Ringe sind explizit geschlossen, i_overlay-Konturen nicht.
fn to_open_contour(ring: &LineString<f64>) -> Vec<[f64; 2]> {
    let mut contour: Vec<[f64; 2]> = ring.coords().map(|c| [c.x, c.y]).collect();
    if contour.len() > 1 && contour.first() == contour.last() {
        contour.pop();
    }
    contour
}

/// Abgefangener Abbruch innerhalb eines Kernel-Aufrufs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelPanic {
    pub message: String,
}

/// Führt einen Kernel-Block aus und wandelt Panics in einen Fehlerwert.
///
/// Die Engines rufen dies genau einmal an ihrer Außengrenze auf.
pub fn guarded<T>(f: impl FnOnce() -> T) -> Result<T, KernelPanic> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unbekannter Kernel-Fehler".to_string()
        };
        KernelPanic { message }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::tests::rect;
    use approx::assert_relative_eq;

    #[test]
    fn predicates_on_edge_sharing_squares() {
        let kernel = GeoKernel;
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(1.0, 0.0, 2.0, 1.0);

        assert!(kernel.touches(&a, &b));
        assert!(kernel.intersects(&a, &b));
        assert!(!kernel.overlaps(&a, &b));
        assert_relative_eq!(kernel.intersection_area(&a, &b), 0.0);
    }

    #[test]
    fn predicates_on_overlapping_squares() {
        let kernel = GeoKernel;
        let a = rect(0.0, 0.0, 2.0, 2.0);
        let b = rect(1.0, 1.0, 3.0, 3.0);

        assert!(!kernel.touches(&a, &b));
        assert!(kernel.overlaps(&a, &b));
        assert_relative_eq!(kernel.intersection_area(&a, &b), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn split_square_along_vertical_line() {
        let kernel = GeoKernel;
        let square = rect(0.0, 0.0, 10.0, 10.0);
        let line = LineString::from(vec![(5.0, -5.0), (5.0, 15.0)]);

        let parts = kernel.split(&square, &[line]);

        assert_eq!(parts.len(), 2);
        let total: f64 = parts.iter().map(|p| p.unsigned_area()).sum();
        assert_relative_eq!(total, 100.0, epsilon = 1e-6);
    }

    #[test]
    fn buffer_zero_resolves_bow_tie() {
        let kernel = GeoKernel;
        let bow_tie = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)]),
            vec![],
        );
        let geometry = MultiPolygon::new(vec![bow_tie]);
        assert!(!kernel.is_valid(&geometry));

        let repaired = kernel.buffer_zero(&geometry);

        assert!(kernel.is_valid(&repaired));
        assert_relative_eq!(repaired.unsigned_area(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn buffer_zero_merges_overlapping_parts() {
        let kernel = GeoKernel;
        let geometry = MultiPolygon::new(vec![rect(0.0, 0.0, 2.0, 1.0), rect(1.0, 0.0, 3.0, 1.0)]);

        let repaired = kernel.buffer_zero(&geometry);

        assert!(kernel.is_valid(&repaired));
        assert_eq!(repaired.0.len(), 1);
        assert_relative_eq!(repaired.unsigned_area(), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn buffer_line_covers_strip_around_segment() {
        let kernel = GeoKernel;
        let line = LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]);

        let strip = kernel.buffer_line(&line, 0.5);

        assert!(strip.intersects(&geo::Point::new(5.0, 0.4)));
        assert!(!strip.intersects(&geo::Point::new(5.0, 0.6)));
        // 10 × 1 Rechteck plus zwei Halbkreis-Kappen
        assert!(strip.unsigned_area() > 10.0);
    }

    #[test]
    fn guarded_converts_panic_to_error() {
        let result: Result<(), KernelPanic> = guarded(|| panic!("kaputt"));
        assert_eq!(result.unwrap_err().message, "kaputt");
    }
}
