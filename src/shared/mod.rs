//! Geteilte Typen für schichtübergreifende Verträge.
//!
//! Enthält die Engine-Konfiguration, die von `app` (Engines, Controller) und
//! der Binary gleichermaßen gelesen wird.
pub mod options;

pub use options::EngineOptions;
