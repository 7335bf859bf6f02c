use crate::types::{AttributeMap, EdgeKey, NodeKey};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub key: NodeKey,
    pub attributes: AttributeMap,
}

#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub source: usize,
    pub target: usize,
    pub key: EdgeKey,
    pub attributes: AttributeMap,
}

/// Borrowed view of a node as yielded by `GraphSource::nodes`
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    pub key: &'a str,
    pub attributes: &'a AttributeMap,
}

/// Borrowed view of an edge as yielded by `GraphSource::edges`.
/// For undirected graphs `source` is the endpoint reported first, not
/// necessarily the one written first in the file.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub key: &'a EdgeKey,
    pub attributes: &'a AttributeMap,
}

#[derive(Debug, Clone, Default)]
struct Adjacency {
    /// Neighbours in order of their first connecting edge
    neighbors: Vec<usize>,
    /// Neighbour -> index into `RoadGraph::bundles`
    bundle_of: HashMap<usize, usize>,
}

/// Attributed multigraph with the iteration order of the mapping toolkit
/// that produced the GraphML:
///
/// - nodes in insertion order
/// - edges grouped by source node (node order), then by neighbour (order of
///   first adjacency), then by parallel-edge key (insertion order)
/// - undirected edges reported once, from whichever endpoint comes first
#[derive(Debug, Clone)]
pub struct RoadGraph {
    directed: bool,
    nodes: Vec<GraphNode>,
    node_index: HashMap<NodeKey, usize>,
    edges: Vec<GraphEdge>,
    /// Parallel edges between one endpoint pair, in key insertion order.
    /// Undirected graphs share one bundle between both endpoints.
    bundles: Vec<Vec<usize>>,
    /// Successors for directed graphs, neighbours for undirected ones
    adjacency: Vec<Adjacency>,
    /// Graph-level `<data>` values
    pub attributes: AttributeMap,
}

impl RoadGraph {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            nodes: Vec::new(),
            node_index: HashMap::new(),
            edges: Vec::new(),
            bundles: Vec::new(),
            adjacency: Vec::new(),
            attributes: AttributeMap::new(),
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, key: &str) -> bool {
        self.node_index.contains_key(key)
    }

    pub fn node_attributes(&self, key: &str) -> Option<&AttributeMap> {
        self.node_index.get(key).map(|&i| &self.nodes[i].attributes)
    }

    /// Add a node, or merge `attributes` into an existing one
    pub fn add_node(&mut self, key: &str, attributes: AttributeMap) {
        let index = self.ensure_node(key);
        self.nodes[index].attributes.extend(attributes);
    }

    fn ensure_node(&mut self, key: &str) -> usize {
        if let Some(&index) = self.node_index.get(key) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes.push(GraphNode {
            key: key.to_string(),
            attributes: AttributeMap::new(),
        });
        self.node_index.insert(key.to_string(), index);
        self.adjacency.push(Adjacency::default());
        index
    }

    /// Add an edge and return its parallel-edge key.
    ///
    /// Missing endpoints are created without attributes. With `key = None`
    /// the lowest free integer key at or above the current number of parallel
    /// edges is used. An existing key merges `attributes` into that edge
    /// instead of adding a new one.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        key: Option<EdgeKey>,
        attributes: AttributeMap,
    ) -> EdgeKey {
        let u = self.ensure_node(source);
        let v = self.ensure_node(target);
        let bundle = self.bundle_between(u, v);

        let key = match key {
            Some(key) => key,
            None => self.next_free_key(bundle),
        };

        let existing = self.bundles[bundle]
            .iter()
            .copied()
            .find(|&e| self.edges[e].key == key);
        if let Some(existing) = existing {
            self.edges[existing].attributes.extend(attributes);
            return key;
        }

        let edge_id = self.edges.len();
        self.edges.push(GraphEdge {
            source: u,
            target: v,
            key: key.clone(),
            attributes,
        });
        self.bundles[bundle].push(edge_id);
        key
    }

    /// Find or create the bundle for `u -> v` (or `u -- v` when undirected)
    fn bundle_between(&mut self, u: usize, v: usize) -> usize {
        if let Some(&bundle) = self.adjacency[u].bundle_of.get(&v) {
            return bundle;
        }
        let bundle = self.bundles.len();
        self.bundles.push(Vec::new());
        self.adjacency[u].neighbors.push(v);
        self.adjacency[u].bundle_of.insert(v, bundle);
        if !self.directed && u != v {
            self.adjacency[v].neighbors.push(u);
            self.adjacency[v].bundle_of.insert(u, bundle);
        }
        bundle
    }

    fn next_free_key(&self, bundle: usize) -> EdgeKey {
        let taken = &self.bundles[bundle];
        let mut candidate = taken.len() as i64;
        while taken
            .iter()
            .any(|&e| self.edges[e].key == EdgeKey::Int(candidate))
        {
            candidate += 1;
        }
        EdgeKey::Int(candidate)
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = NodeView<'_>> + '_ {
        self.nodes.iter().map(|node| NodeView {
            key: &node.key,
            attributes: &node.attributes,
        })
    }

    /// All edges, parallel edges included, in toolkit iteration order
    pub fn iter_edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        let mut ordered = Vec::with_capacity(self.edges.len());
        let mut seen = vec![false; self.nodes.len()];

        for (u, adjacency) in self.adjacency.iter().enumerate() {
            for &v in &adjacency.neighbors {
                if !self.directed && seen[v] {
                    continue;
                }
                let bundle = adjacency.bundle_of[&v];
                for &e in &self.bundles[bundle] {
                    let edge = &self.edges[e];
                    ordered.push(EdgeView {
                        source: &self.nodes[u].key,
                        target: &self.nodes[v].key,
                        key: &edge.key,
                        attributes: &edge.attributes,
                    });
                }
            }
            seen[u] = true;
        }

        ordered.into_iter()
    }
}
