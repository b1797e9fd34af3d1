//! Use-Case-Funktionen für Topologie-Bearbeitungen.
//!
//! Aufgeteilt nach Operation:
//! - `merge`: benachbarte Polygone zusammenführen
//! - `cut`: Polygon entlang einer Polylinie schneiden (inkl. Ausweichstrategien)

mod cut;
mod merge;

pub use cut::{cut_polygon, cut_polygon_with, CutReport, CutState, CutStrategy};
pub use merge::{merge_polygons, merge_polygons_with};
