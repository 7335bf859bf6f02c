//! GraphML reader
//!
//! Reading happens in two passes:
//! 1. `scan` streams the XML with quick-xml and collects keys, nodes, edges
//!    and `<data>` text without interpreting values. Keys may legally be
//!    declared anywhere under `<graphml>`, so values cannot be typed yet.
//! 2. `materialize` resolves every `<data>` against the key registry and
//!    builds the `RoadGraph`: all nodes first, then all edges, in document
//!    order.
//!
//! Only the first `<graph>` is read. Hyperedges and graphs nested inside
//! nodes are rejected; ports, descriptions and unknown elements are skipped.

use super::keys::{decode_value, KeyDomain, KeyRegistry, KeySpec};
use crate::error::{ExportError, ExportResult};
use crate::graphs::RoadGraph;
use crate::types::{AttrType, AttrValue, AttributeMap, EdgeKey};
use flate2::read::GzDecoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct GraphMlOptions {
    /// Fill missing attributes from `<key><default>` values
    pub apply_key_defaults: bool,
}

/// Load a GraphML file. Paths ending in `.gz` are decompressed on the fly.
pub fn load_graphml(path: &Path, options: &GraphMlOptions) -> ExportResult<RoadGraph> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ExportError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => ExportError::graph_load(path, e.to_string()),
    })?;

    let gzipped = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("gz"));
    if gzipped {
        read_graphml(BufReader::new(GzDecoder::new(file)), path, options)
    } else {
        read_graphml(BufReader::new(file), path, options)
    }
}

/// Parse GraphML held in memory
pub fn parse_graphml_str(xml: &str, options: &GraphMlOptions) -> ExportResult<RoadGraph> {
    read_graphml(xml.as_bytes(), Path::new("<memory>"), options)
}

/// Parse GraphML from any buffered source; `origin` is only used in error messages
pub fn read_graphml<R: BufRead>(
    source: R,
    origin: &Path,
    options: &GraphMlOptions,
) -> ExportResult<RoadGraph> {
    let raw = scan(source).map_err(|reason| ExportError::graph_load(origin, reason))?;
    materialize(raw, options).map_err(|reason| ExportError::graph_load(origin, reason))
}

// ===== PASS 1: SCAN =====

#[derive(Debug, Clone)]
struct RawData {
    key: String,
    text: Option<String>,
    /// Data with child elements (yFiles graphics and the like) carries no plain value
    has_children: bool,
}

#[derive(Debug, Clone)]
struct RawKey {
    id: String,
    name: Option<String>,
    attr_type: Option<String>,
    domain: KeyDomain,
    default_text: Option<String>,
}

#[derive(Debug, Clone)]
struct RawNode {
    id: String,
    data: Vec<RawData>,
}

#[derive(Debug, Clone)]
struct RawEdge {
    id: Option<String>,
    source: String,
    target: String,
    data: Vec<RawData>,
}

#[derive(Debug, Clone)]
struct RawGraph {
    directed: bool,
    nodes: Vec<RawNode>,
    edges: Vec<RawEdge>,
    data: Vec<RawData>,
}

#[derive(Debug, Default)]
struct RawDocument {
    keys: Vec<RawKey>,
    graph: Option<RawGraph>,
    skipped_graphs: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Root,
    Key,
    KeyDefault,
    Graph,
    Node,
    Edge,
    Data,
    Skip,
}

#[derive(Debug, Default)]
struct Scanner {
    document: RawDocument,
    stack: Vec<Frame>,
    saw_root: bool,
    node: Option<RawNode>,
    edge: Option<RawEdge>,
    data: Option<RawData>,
}

fn scan<R: BufRead>(source: R) -> Result<RawDocument, String> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(false);

    let mut scanner = Scanner::default();
    let mut buf = Vec::new();
    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => {
                return Err(format!(
                    "malformed XML near byte {}: {e}",
                    reader.buffer_position()
                ))
            }
        };
        match event {
            Event::Start(e) => scanner.open(&e)?,
            Event::Empty(e) => {
                scanner.open(&e)?;
                scanner.close();
            }
            Event::End(_) => scanner.close(),
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| format!("invalid text content: {e}"))?;
                scanner.text(&text);
            }
            Event::CData(c) => {
                let bytes = c.into_inner();
                let text = std::str::from_utf8(&bytes)
                    .map_err(|e| format!("CDATA section is not valid UTF-8: {e}"))?;
                scanner.text(text);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    scanner.finish()
}

fn element_attributes(e: &BytesStart) -> Result<HashMap<String, String>, String> {
    let mut attributes = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| format!("invalid XML attribute: {err}"))?;
        let name = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| format!("invalid value for attribute '{name}': {err}"))?
            .into_owned();
        attributes.insert(name, value);
    }
    Ok(attributes)
}

impl Scanner {
    fn open(&mut self, e: &BytesStart) -> Result<(), String> {
        let local = e.local_name();
        let name = local.as_ref();
        let parent = self.stack.last().copied();

        let frame = match (parent, name) {
            (None, _) if self.saw_root => Frame::Skip,
            (None, b"graphml") => {
                self.saw_root = true;
                Frame::Root
            }
            (None, other) => {
                return Err(format!(
                    "root element is <{}>, expected <graphml>",
                    String::from_utf8_lossy(other)
                ))
            }
            (Some(Frame::Skip), _) => Frame::Skip,
            (Some(Frame::Data), _) => {
                if let Some(data) = self.data.as_mut() {
                    data.has_children = true;
                }
                Frame::Skip
            }
            (Some(Frame::Root), b"key") => {
                let mut attrs = element_attributes(e)?;
                let id = attrs
                    .remove("id")
                    .ok_or_else(|| "<key> element without an id".to_string())?;
                self.document.keys.push(RawKey {
                    id,
                    name: attrs.remove("attr.name"),
                    attr_type: attrs.remove("attr.type"),
                    domain: KeyDomain::from_graphml(attrs.get("for").map(String::as_str)),
                    default_text: None,
                });
                Frame::Key
            }
            (Some(Frame::Key), b"default") => Frame::KeyDefault,
            (Some(Frame::Root), b"graph") => {
                if self.document.graph.is_some() {
                    self.document.skipped_graphs += 1;
                    Frame::Skip
                } else {
                    let attrs = element_attributes(e)?;
                    let directed = attrs.get("edgedefault").map(String::as_str) == Some("directed");
                    self.document.graph = Some(RawGraph {
                        directed,
                        nodes: Vec::new(),
                        edges: Vec::new(),
                        data: Vec::new(),
                    });
                    Frame::Graph
                }
            }
            (Some(Frame::Graph), b"node") => {
                let mut attrs = element_attributes(e)?;
                let id = attrs
                    .remove("id")
                    .ok_or_else(|| "<node> element without an id".to_string())?;
                self.node = Some(RawNode {
                    id,
                    data: Vec::new(),
                });
                Frame::Node
            }
            (Some(Frame::Graph), b"edge") => {
                let mut attrs = element_attributes(e)?;
                let source = attrs
                    .remove("source")
                    .ok_or_else(|| "<edge> element without a source".to_string())?;
                let target = attrs
                    .remove("target")
                    .ok_or_else(|| "<edge> element without a target".to_string())?;
                let directed = self.document.graph.as_ref().map_or(false, |g| g.directed);
                match (directed, attrs.get("directed").map(String::as_str)) {
                    (true, Some("false")) => {
                        return Err(format!(
                            "undirected edge '{source}'->'{target}' in a directed graph"
                        ))
                    }
                    (false, Some("true")) => {
                        return Err(format!(
                            "directed edge '{source}'->'{target}' in an undirected graph"
                        ))
                    }
                    _ => {}
                }
                self.edge = Some(RawEdge {
                    id: attrs.remove("id"),
                    source,
                    target,
                    data: Vec::new(),
                });
                Frame::Edge
            }
            (Some(Frame::Graph), b"hyperedge") => {
                return Err("hyperedges are not supported".to_string())
            }
            (Some(Frame::Node), b"graph") => {
                let id = self.node.as_ref().map(|n| n.id.as_str()).unwrap_or_default();
                return Err(format!("nested graph inside node '{id}' is not supported"));
            }
            (Some(Frame::Node | Frame::Edge | Frame::Graph), b"data") => {
                let mut attrs = element_attributes(e)?;
                let key = attrs
                    .remove("key")
                    .ok_or_else(|| "<data> element without a key".to_string())?;
                self.data = Some(RawData {
                    key,
                    text: None,
                    has_children: false,
                });
                Frame::Data
            }
            _ => Frame::Skip,
        };

        self.stack.push(frame);
        Ok(())
    }

    fn text(&mut self, content: &str) {
        if content.is_empty() {
            return;
        }
        match self.stack.last() {
            Some(Frame::Data) => {
                if let Some(data) = self.data.as_mut() {
                    if !data.has_children {
                        data.text.get_or_insert_with(String::new).push_str(content);
                    }
                }
            }
            Some(Frame::KeyDefault) => {
                if let Some(key) = self.document.keys.last_mut() {
                    key.default_text
                        .get_or_insert_with(String::new)
                        .push_str(content);
                }
            }
            _ => {}
        }
    }

    fn close(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Data => {
                let Some(data) = self.data.take() else {
                    return;
                };
                match self.stack.last() {
                    Some(Frame::Node) => {
                        if let Some(node) = self.node.as_mut() {
                            node.data.push(data);
                        }
                    }
                    Some(Frame::Edge) => {
                        if let Some(edge) = self.edge.as_mut() {
                            edge.data.push(data);
                        }
                    }
                    Some(Frame::Graph) => {
                        if let Some(graph) = self.document.graph.as_mut() {
                            graph.data.push(data);
                        }
                    }
                    _ => {}
                }
            }
            Frame::Node => {
                if let (Some(node), Some(graph)) = (self.node.take(), self.document.graph.as_mut()) {
                    graph.nodes.push(node);
                }
            }
            Frame::Edge => {
                if let (Some(edge), Some(graph)) = (self.edge.take(), self.document.graph.as_mut()) {
                    graph.edges.push(edge);
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Result<RawDocument, String> {
        if !self.saw_root {
            return Err("no <graphml> root element found".to_string());
        }
        if !self.stack.is_empty() {
            return Err("unexpected end of file (unclosed elements)".to_string());
        }
        Ok(self.document)
    }
}

// ===== PASS 2: MATERIALIZE =====

fn materialize(raw: RawDocument, options: &GraphMlOptions) -> Result<RoadGraph, String> {
    let registry = build_registry(raw.keys)?;

    let graph_raw = raw
        .graph
        .ok_or_else(|| "document contains no <graph> element".to_string())?;
    if raw.skipped_graphs > 0 {
        eprintln!(
            "⚠️  GraphML holds {} additional <graph> element(s); only the first is exported",
            raw.skipped_graphs
        );
    }

    let mut graph = RoadGraph::new(graph_raw.directed);

    for node in graph_raw.nodes {
        let element = format!("node '{}'", node.id);
        let mut attributes = decode_data(&registry, &node.data, &element)?;
        if options.apply_key_defaults {
            fill_defaults(&mut attributes, &registry, KeyDomain::Node);
        }
        graph.add_node(&node.id, attributes);
    }

    for edge in graph_raw.edges {
        let element = format!("edge '{}'->'{}'", edge.source, edge.target);
        let mut attributes = decode_data(&registry, &edge.data, &element)?;
        if options.apply_key_defaults {
            fill_defaults(&mut attributes, &registry, KeyDomain::Edge);
        }
        let key = match edge.id.as_deref() {
            Some(id) if !id.is_empty() => Some(EdgeKey::from_graphml_id(id)),
            _ => attributes.get("key").map(edge_key_from_value),
        };
        graph.add_edge(&edge.source, &edge.target, key, attributes);
    }

    graph.attributes = decode_data(&registry, &graph_raw.data, "graph")?;
    Ok(graph)
}

fn build_registry(keys: Vec<RawKey>) -> Result<KeyRegistry, String> {
    let mut registry = KeyRegistry::new();
    for key in keys {
        let name = key
            .name
            .ok_or_else(|| format!("key '{}' has no attr.name", key.id))?;
        let attr_type = match key.attr_type.as_deref() {
            Some(declared) => AttrType::from_graphml(declared)
                .ok_or_else(|| format!("key '{}' has unknown attr.type '{declared}'", key.id))?,
            None => {
                eprintln!("⚠️  Key '{}' has no attr.type, reading it as string", key.id);
                AttrType::String
            }
        };
        let default = match key.default_text.as_deref() {
            Some(text) => Some(
                decode_value(attr_type, text)
                    .map_err(|e| format!("default of key '{}': {e}", key.id))?,
            ),
            None => None,
        };
        registry.insert(KeySpec {
            id: key.id,
            name,
            attr_type,
            domain: key.domain,
            default,
        });
    }
    Ok(registry)
}

fn decode_data(
    registry: &KeyRegistry,
    data: &[RawData],
    element: &str,
) -> Result<AttributeMap, String> {
    let mut attributes = AttributeMap::new();
    for item in data {
        let spec = registry
            .get(&item.key)
            .ok_or_else(|| format!("{element} references undeclared key '{}'", item.key))?;
        if item.has_children {
            continue;
        }
        if let Some(text) = item.text.as_deref() {
            let value = decode_value(spec.attr_type, text)
                .map_err(|e| format!("{element}, attribute '{}': {e}", spec.name))?;
            attributes.insert(spec.name.clone(), value);
        }
    }
    Ok(attributes)
}

fn fill_defaults(attributes: &mut AttributeMap, registry: &KeyRegistry, domain: KeyDomain) {
    for (name, value) in registry.defaults_for(domain) {
        attributes
            .entry(name.to_string())
            .or_insert_with(|| value.clone());
    }
}

/// Parallel-edge key taken from a `key` data attribute when the edge has no id
fn edge_key_from_value(value: &AttrValue) -> EdgeKey {
    match value {
        AttrValue::Int(i) => EdgeKey::Int(*i),
        AttrValue::Bool(b) => EdgeKey::Int(i64::from(*b)),
        AttrValue::Float(f) if f.fract() == 0.0 && f.is_finite() => EdgeKey::Int(*f as i64),
        AttrValue::Float(f) => EdgeKey::Str(f.to_string()),
        AttrValue::Str(s) => EdgeKey::Str(s.clone()),
    }
}
