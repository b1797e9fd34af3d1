//! GeoJSON Import/Export für Feature-Sets.
//!
//! Gelesen und geschrieben wird eine `FeatureCollection` mit optionalem
//! benanntem CRS (`{"type": "name", "properties": {"name": ...}}`). Zulässig
//! sind nur `Polygon`- und `MultiPolygon`-Geometrien.

pub mod parser;
pub mod writer;

pub use parser::{parse_feature_collection, GeoJsonError};
pub use writer::{feature_collection_value, write_feature_collection};
