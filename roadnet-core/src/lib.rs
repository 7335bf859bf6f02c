// Roadnet Core Library
//
// Loads security-annotated road networks from GraphML and flattens them into
// the node/edge JSON document consumed by the map client.

pub mod types;
pub mod error;
pub mod config;
pub mod lookup;
pub mod graphml;
pub mod graphs;
pub mod exporter;
pub mod report;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::{ExportError, ExportResult};
pub use config::{CoordinateFallback, ExportConfig};
pub use graphml::{load_graphml, parse_graphml_str, GraphMlOptions};
pub use graphs::{GraphSource, RecordBuilder, RoadGraph};
pub use exporter::{GraphExporter, StepProfiler};
pub use report::ExportReport;
