// GraphSource - the capability boundary between graph loading and record export
//
// The exporter never sees GraphML. It only needs to walk nodes and edges with
// their attribute dictionaries, so any in-memory graph can be exported by
// implementing this trait.

use super::graph::{EdgeView, NodeView, RoadGraph};

pub trait GraphSource {
    fn node_count(&self) -> usize;

    /// Edge count with every parallel edge counted separately
    fn edge_count(&self) -> usize;

    /// Nodes as `(key, attributes)` in source iteration order
    fn nodes(&self) -> Box<dyn Iterator<Item = NodeView<'_>> + '_>;

    /// Edges as `(source, target, parallel key, attributes)` in source iteration order
    fn edges(&self) -> Box<dyn Iterator<Item = EdgeView<'_>> + '_>;
}

impl GraphSource for RoadGraph {
    fn node_count(&self) -> usize {
        RoadGraph::node_count(self)
    }

    fn edge_count(&self) -> usize {
        RoadGraph::edge_count(self)
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = NodeView<'_>> + '_> {
        Box::new(self.iter_nodes())
    }

    fn edges(&self) -> Box<dyn Iterator<Item = EdgeView<'_>> + '_> {
        Box::new(self.iter_edges())
    }
}
