use geo::polygon;
use layer_topology_editor::app::EditErrorKind;
use layer_topology_editor::{
    parse_feature_collection, AttributeValue, DirectoryLayerStore, EditCommand, EngineOptions,
    FeatureSet, InMemoryLayerStore, Layer, LayerEditController, LayerId, LayerStore, SelectionId,
};

const FIXTURE: &str = include_str!("fixtures/three_fields.geojson");

fn fixture_set() -> FeatureSet {
    parse_feature_collection(FIXTURE).expect("Fixture ist gültig")
}

fn controller_with_layer() -> LayerEditController<InMemoryLayerStore> {
    let store = InMemoryLayerStore::new();
    store
        .insert(Layer::new("felder", "Felder", fixture_set()))
        .expect("insert");
    LayerEditController::new(store, EngineOptions::default())
}

fn merge(selection: &[usize]) -> EditCommand {
    EditCommand::Merge {
        layer: LayerId::from("felder"),
        selection: selection.iter().copied().map(SelectionId::from).collect(),
    }
}

#[test]
fn test_first_merge_reads_original_and_writes_processed() {
    let controller = controller_with_layer();
    let outcome = controller.handle_command(merge(&[0, 1])).expect("Store ok");
    assert!(outcome.success, "{}", outcome.message);

    let layer = controller.store().load(&LayerId::from("felder")).expect("laden");
    assert_eq!(layer.original, fixture_set());
    let processed = layer.processed.expect("bearbeiteter Stand");
    assert_eq!(processed.len(), 2);
    assert_eq!(
        processed.features[1].property("source_layer"),
        Some(&AttributeValue::from("original"))
    );
}

#[test]
fn test_second_edit_reads_processed() {
    let controller = controller_with_layer();
    controller.handle_command(merge(&[0, 1])).expect("Store ok");

    // Im bearbeiteten Stand liegt das Ergebnis an Position 1
    let outcome = controller
        .handle_command(EditCommand::Cut {
            layer: LayerId::from("felder"),
            target: SelectionId::from(1usize),
            line: vec![[1.0, -1.0], [1.0, 2.0]],
        })
        .expect("Store ok");
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.feature_set.len(), 3);
    assert_eq!(
        outcome.feature_set.features[1].property("original_feature"),
        Some(&AttributeValue::from("1"))
    );
}

#[test]
fn test_failed_edit_does_not_write() {
    let controller = controller_with_layer();
    let outcome = controller.handle_command(merge(&[0, 2])).expect("Store ok");
    assert!(!outcome.success);
    assert_eq!(outcome.error, Some(EditErrorKind::NotAdjacent));

    let layer = controller.store().load(&LayerId::from("felder")).expect("laden");
    assert!(layer.processed.is_none());

    let history = controller.command_history();
    assert_eq!(history.len(), 1);
    assert!(!history[0].success);
}

#[test]
fn test_unknown_layer_is_store_error() {
    let controller = controller_with_layer();
    let result = controller.handle_command(EditCommand::Merge {
        layer: LayerId::from("fehlt"),
        selection: vec![SelectionId::from(0usize), SelectionId::from(1usize)],
    });
    assert!(result.is_err());
}

#[test]
fn test_concurrent_edits_on_one_layer_are_serialized() {
    let store = InMemoryLayerStore::new();
    // Acht Quadrate in einer Reihe
    let features = (0..8)
        .map(|i| {
            let x = i as f64;
            layer_topology_editor::Feature::new(polygon![
                (x: x, y: 0.0), (x: x + 1.0, y: 0.0), (x: x + 1.0, y: 1.0), (x: x, y: 1.0)
            ])
        })
        .collect();
    store
        .insert(Layer::new("reihe", "Reihe", FeatureSet::new(features)))
        .expect("insert");
    let controller = LayerEditController::new(store, EngineOptions::default());

    // Jeder Merge der ersten beiden Positionen reduziert um genau eins,
    // solange die Bearbeitungen nacheinander laufen.
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let outcome = controller
                    .handle_command(EditCommand::Merge {
                        layer: LayerId::from("reihe"),
                        selection: vec![SelectionId::from(0usize), SelectionId::from(1usize)],
                    })
                    .expect("Store ok");
                assert!(outcome.success, "{}", outcome.message);
            });
        }
    });

    let layer = controller.store().load(&LayerId::from("reihe")).expect("laden");
    assert_eq!(layer.processed.map(|p| p.len()), Some(8 - 4));
    assert_eq!(controller.command_history().len(), 4);
}

#[test]
fn test_directory_store_flow() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = DirectoryLayerStore::open(dir.path()).expect("öffnen");
    store
        .insert(Layer::new("felder", "Felder", fixture_set()))
        .expect("insert");

    let controller = LayerEditController::new(store, EngineOptions::default());
    let outcome = controller.handle_command(merge(&[0, 1])).expect("Store ok");
    assert!(outcome.success, "{}", outcome.message);

    assert!(dir.path().join("felder.processed.geojson").exists());
    let reopened = DirectoryLayerStore::open(dir.path()).expect("öffnen");
    let layer = reopened.load(&LayerId::from("felder")).expect("laden");
    assert_eq!(layer.processed.map(|p| p.len()), Some(2));
}
