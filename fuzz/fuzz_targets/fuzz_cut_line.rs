#![no_main]

use geo::polygon;
use layer_topology_editor::{cut_polygon, EngineOptions, Feature, FeatureSet, SelectionId};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Je 16 Bytes ein Punkt der Schnittlinie
    let line: Vec<[f64; 2]> = data
        .chunks_exact(16)
        .take(16)
        .map(|chunk| {
            let mut x = [0u8; 8];
            let mut y = [0u8; 8];
            x.copy_from_slice(&chunk[..8]);
            y.copy_from_slice(&chunk[8..]);
            [f64::from_le_bytes(x), f64::from_le_bytes(y)]
        })
        .collect();

    let set = FeatureSet::new(vec![Feature::new(polygon![
        (x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)
    ])]);

    // Darf fehlschlagen, aber nie abstürzen
    let _ = cut_polygon(&set, &SelectionId::from(0usize), &line, &EngineOptions::default());
});
