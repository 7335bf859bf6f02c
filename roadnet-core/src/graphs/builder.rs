use super::graph::{EdgeView, NodeView};
use super::source::GraphSource;
use crate::config::ExportConfig;
use crate::error::ExportResult;
use crate::lookup::{coerce_float, float_or, int_or, lookup_aliased, optional_float};
use crate::types::*;

/// Maps source nodes and edges onto flat output records.
///
/// One record per source element, in source order. Nothing is merged,
/// dropped or sorted here.
pub struct RecordBuilder<'a> {
    config: &'a ExportConfig,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(config: &'a ExportConfig) -> Self {
        Self { config }
    }

    pub fn build_document(&self, graph: &dyn GraphSource) -> ExportResult<GraphDocument> {
        Ok(GraphDocument {
            nodes: self.build_nodes(graph)?,
            edges: self.build_edges(graph)?,
        })
    }

    pub fn build_nodes(&self, graph: &dyn GraphSource) -> ExportResult<Vec<NodeRecord>> {
        let mut nodes = Vec::with_capacity(graph.node_count());
        for node in graph.nodes() {
            nodes.push(self.node_record(node)?);
        }
        Ok(nodes)
    }

    pub fn build_edges(&self, graph: &dyn GraphSource) -> ExportResult<Vec<EdgeRecord>> {
        let mut edges = Vec::with_capacity(graph.edge_count());
        for edge in graph.edges() {
            edges.push(self.edge_record(edge)?);
        }
        Ok(edges)
    }

    pub fn node_record(&self, node: NodeView<'_>) -> ExportResult<NodeRecord> {
        let element = format!("node '{}'", node.key);
        let policy = self.config.coordinate_fallback;

        let latitude = match lookup_aliased(node.attributes, &self.config.latitude_keys, policy) {
            Some(value) => coerce_float(value, &element, "latitude")?,
            None => 0.0,
        };
        let longitude = match lookup_aliased(node.attributes, &self.config.longitude_keys, policy) {
            Some(value) => coerce_float(value, &element, "longitude")?,
            None => 0.0,
        };

        Ok(NodeRecord {
            id: node.key.to_string(),
            latitude,
            longitude,
        })
    }

    pub fn edge_record(&self, edge: EdgeView<'_>) -> ExportResult<EdgeRecord> {
        let element = format!("edge '{}'->'{}' (key {})", edge.source, edge.target, edge.key);
        let attributes = edge.attributes;

        Ok(EdgeRecord {
            from: edge.source.to_string(),
            to: edge.target.to_string(),
            length: float_or(attributes, "length", self.config.default_length, &element)?,
            travel_time: optional_float(attributes, "travel_time", &element)?,
            security_cost_factor: float_or(
                attributes,
                "security_cost_factor",
                self.config.default_security_cost_factor,
                &element,
            )?,
            covered_by_cameras: int_or(
                attributes,
                "covered_by_cameras",
                self.config.default_covered_by_cameras,
                &element,
            )?,
        })
    }
}
