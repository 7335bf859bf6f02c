use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

// ===== GRAPHML ATTRIBUTE TYPES =====
// Values decoded from `<data>` elements keep the type declared on their
// `<key attr.type="...">`. Coercion into output fields happens later, in
// `lookup`, so a mistyped attribute is reported against the field it feeds.

/// Declared `attr.type` of a GraphML key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrType {
    Boolean,
    Int,
    Long,
    Float,
    Double,
    String,
}

impl AttrType {
    /// Parse an `attr.type` value. Matching is exact, as GraphML prescribes.
    pub fn from_graphml(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(AttrType::Boolean),
            "int" => Some(AttrType::Int),
            "long" => Some(AttrType::Long),
            "float" => Some(AttrType::Float),
            "double" => Some(AttrType::Double),
            "string" => Some(AttrType::String),
            _ => None,
        }
    }
}

/// A single decoded attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl AttrValue {
    /// True for the sentinels a logical-OR fallback skips over:
    /// `false`, numeric zero (including `-0.0`), and the empty string.
    /// NaN is truthy.
    pub fn is_falsy(&self) -> bool {
        match self {
            AttrValue::Bool(b) => !b,
            AttrValue::Int(i) => *i == 0,
            AttrValue::Float(f) => *f == 0.0,
            AttrValue::Str(s) => s.is_empty(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "boolean",
            AttrValue::Int(_) => "integer",
            AttrValue::Float(_) => "float",
            AttrValue::Str(_) => "string",
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Int(i) => write!(f, "{i}"),
            AttrValue::Float(x) => write!(f, "{x}"),
            AttrValue::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Attribute dictionary attached to a node, an edge, or the graph itself
pub type AttributeMap = HashMap<String, AttrValue>;

/// Node identifier, taken verbatim from the GraphML `id` attribute
pub type NodeKey = String;

/// Key distinguishing parallel edges between the same endpoints.
///
/// GraphML edge ids that parse as integers become `Int`; any other id is kept
/// as a string. Edges without an id get the next free integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeKey {
    Int(i64),
    Str(String),
}

impl EdgeKey {
    pub fn from_graphml_id(id: &str) -> Self {
        match id.trim().parse::<i64>() {
            Ok(i) => EdgeKey::Int(i),
            Err(_) => EdgeKey::Str(id.to_string()),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKey::Int(i) => write!(f, "{i}"),
            EdgeKey::Str(s) => write!(f, "{s}"),
        }
    }
}

// ===== OUTPUT RECORDS =====
// Field order here is the field order in the emitted JSON. The client reads
// these by name, but keep the order stable so repeated exports diff cleanly.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub length: f64,
    /// `None` serializes as `null`: an edge without travel time is not a
    /// zero-cost edge.
    pub travel_time: Option<f64>,
    pub security_cost_factor: f64,
    pub covered_by_cameras: i64,
}

/// The document handed to the map client: `{"nodes": [...], "edges": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

/// Counts returned by a completed export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub node_count: usize,
    pub edge_count: usize,
    /// Graph-level `<data>` of the input (`crs`, `created_with`, ...), sorted by name
    #[serde(default)]
    pub graph_metadata: BTreeMap<String, AttrValue>,
}
