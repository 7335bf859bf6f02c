pub mod builder;
pub mod graph;
pub mod serialization;
pub mod source;
// Re-export for easy access
pub use builder::RecordBuilder;
pub use graph::{EdgeView, NodeView, RoadGraph};
pub use source::GraphSource;
