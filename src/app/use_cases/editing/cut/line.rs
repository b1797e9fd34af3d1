//! Verlängerung der Schnittlinie über die Bounding-Box des Ziels hinaus.

use geo::{Coord, LineString, Rect};

/// Verlängert beide Enden entlang ihrer Endsegment-Richtung um
/// `factor × max(Breite, Höhe)` der Bounding-Box.
///
/// Fallen Anfangs- und Endpunkt zusammen (oder bleibt nach dem Entfernen
/// doppelter Punkte weniger als ein Segment übrig), wird stattdessen die
/// Diagonale der Bounding-Box verwendet.
pub(super) fn extend_cut_line(
    points: &[Coord<f64>],
    bounds: &Rect<f64>,
    factor: f64,
) -> LineString<f64> {
    let mut coords = points.to_vec();
    coords.dedup();

    if coords.len() < 2 || coords.first() == coords.last() {
        log::debug!("Schnittlinie degeneriert, verwende Bounding-Box-Diagonale");
        coords = vec![bounds.min(), bounds.max()];
    }

    let reach = factor * bounds.width().max(bounds.height());
    if reach <= 0.0 || coords[0] == coords[1] {
        return LineString::new(coords);
    }

    let last = coords.len() - 1;
    let start_dir = unit(coords[0] - coords[1]);
    let end_dir = unit(coords[last] - coords[last - 1]);
    coords[0] = coords[0] + start_dir * reach;
    coords[last] = coords[last] + end_dir * reach;

    LineString::new(coords)
}

fn unit(v: Coord<f64>) -> Coord<f64> {
    let len = v.x.hypot(v.y);
    if len > 0.0 {
        v / len
    } else {
        Coord { x: 0.0, y: 0.0 }
    }
}
