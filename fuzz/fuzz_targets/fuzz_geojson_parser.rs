#![no_main]

use layer_topology_editor::{parse_feature_collection, write_feature_collection};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Alles, was gelesen wird, muss sich auch wieder schreiben lassen
    if let Ok(set) = parse_feature_collection(text) {
        let written = write_feature_collection(&set).expect("lesbares Set ist schreibbar");
        let back = parse_feature_collection(&written).expect("geschriebenes Set ist lesbar");
        assert_eq!(back.len(), set.len());
    }
});
