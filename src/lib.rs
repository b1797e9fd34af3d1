//! Layer Topology Editor Library.
//! Polygon-Topologie-Engine (Merge/Cut) als Library exportiert für CLI, Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod geojson;
pub mod shared;

pub use app::{
    cut_polygon, cut_polygon_with, merge_polygons, merge_polygons_with, CutReport, CutState,
    CutStrategy, DirectoryLayerStore, EditCommand, EditContext, EditError, EditErrorKind,
    EditOutcome, EditResult, InMemoryLayerStore, Layer, LayerEditController, LayerId, LayerLocks,
    LayerStore,
};
pub use core::{
    AttributeValue, Crs, Feature, FeatureSet, GeoKernel, GeometryKernel, PolygonGeometry,
    SelectionId, SourceLayer,
};
pub use geojson::{parse_feature_collection, write_feature_collection, GeoJsonError};
pub use shared::EngineOptions;
