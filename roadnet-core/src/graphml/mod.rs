//! GraphML loading
//!
//! ```text
//! .graphml / .graphml.gz
//!     ↓
//! [scan: quick-xml events → raw keys, nodes, edges]
//!     ↓
//! [materialize: typed attributes, parallel-edge keys]
//!     ↓
//! RoadGraph
//! ```

pub mod keys;
pub mod reader;

// Re-export main types
pub use keys::{KeyDomain, KeyRegistry, KeySpec};
pub use reader::{load_graphml, parse_graphml_str, read_graphml, GraphMlOptions};
