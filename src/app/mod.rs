//! Application-Layer: Use-Cases (Merge/Cut), Layer-Speicher, Controller.

pub mod command_log;
pub mod controller;
pub mod error;
pub mod events;
pub mod layer_store;
pub mod locks;
pub mod outcome;
pub mod use_cases;

pub use command_log::{CommandLog, CommandLogEntry};
pub use controller::LayerEditController;
pub use error::{EditError, EditErrorKind};
pub use events::EditCommand;
pub use layer_store::{DirectoryLayerStore, InMemoryLayerStore, Layer, LayerId, LayerStore};
pub use locks::LayerLocks;
pub use outcome::{EditContext, EditOutcome, EditResult};
pub use use_cases::editing::{
    cut_polygon, cut_polygon_with, merge_polygons, merge_polygons_with, CutReport, CutState,
    CutStrategy,
};
