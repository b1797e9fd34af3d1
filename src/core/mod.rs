//! Core-Domänentypen: Geometrie, Features, Feature-Sets, Selektion, Geometrie-Kernel.

pub mod adjacency;
pub mod attributes;
pub mod budget;
pub mod feature;
pub mod feature_set;
pub mod geometry;
pub mod kernel;
pub mod repair;
pub mod selection;
pub mod spatial;

pub use adjacency::are_connected;
pub use attributes::{AttributeMap, AttributeValue};
pub use budget::{BudgetExhausted, OperationBudget};
pub use feature::Feature;
pub use feature_set::{Crs, FeatureSet, SourceLayer};
pub use geometry::PolygonGeometry;
pub use kernel::{guarded, GeoKernel, GeometryKernel, KernelPanic};
pub use repair::{is_usable, repair, Unrepairable};
pub use selection::{resolve_selection, resolve_target, SelectionId};
pub use spatial::EnvelopeIndex;
