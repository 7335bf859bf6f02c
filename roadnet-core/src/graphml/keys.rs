//! GraphML `<key>` declarations and typed value decoding

use crate::types::{AttrType, AttrValue};
use std::collections::HashMap;

/// Which elements a key may annotate (`for="..."`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDomain {
    Node,
    Edge,
    Graph,
    All,
    /// Any other `for` value (`graphml`, `port`, `hyperedge`, ...)
    Other,
}

impl KeyDomain {
    pub fn from_graphml(value: Option<&str>) -> Self {
        match value {
            Some("node") => KeyDomain::Node,
            Some("edge") => KeyDomain::Edge,
            Some("graph") => KeyDomain::Graph,
            Some("all") | None => KeyDomain::All,
            Some(_) => KeyDomain::Other,
        }
    }

    pub fn applies_to(self, element: KeyDomain) -> bool {
        self == KeyDomain::All || self == element
    }
}

#[derive(Debug, Clone)]
pub struct KeySpec {
    pub id: String,
    /// Attribute name used on decoded elements (`attr.name`)
    pub name: String,
    pub attr_type: AttrType,
    pub domain: KeyDomain,
    pub default: Option<AttrValue>,
}

/// All keys of a document, by id
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    keys: HashMap<String, KeySpec>,
    /// Declaration order, for deterministic default application
    order: Vec<String>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key. A repeated id replaces the earlier declaration.
    pub fn insert(&mut self, spec: KeySpec) {
        if !self.keys.contains_key(&spec.id) {
            self.order.push(spec.id.clone());
        }
        self.keys.insert(spec.id.clone(), spec);
    }

    pub fn get(&self, id: &str) -> Option<&KeySpec> {
        self.keys.get(id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys with a `<default>` that apply to `domain`, in declaration order
    pub fn defaults_for(&self, domain: KeyDomain) -> impl Iterator<Item = (&str, &AttrValue)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.keys.get(id))
            .filter(move |spec| spec.domain.applies_to(domain))
            .filter_map(|spec| spec.default.as_ref().map(|v| (spec.name.as_str(), v)))
    }
}

/// Decode the text of a `<data>` or `<default>` element.
///
/// Booleans accept `true`/`false`/`1`/`0` in any case but no surrounding
/// whitespace. Numbers are trimmed before parsing. Strings are kept verbatim.
pub fn decode_value(attr_type: AttrType, text: &str) -> Result<AttrValue, String> {
    match attr_type {
        AttrType::Boolean => match text.to_lowercase().as_str() {
            "true" | "1" => Ok(AttrValue::Bool(true)),
            "false" | "0" => Ok(AttrValue::Bool(false)),
            _ => Err(format!("invalid boolean value {text:?}")),
        },
        AttrType::Int | AttrType::Long => text
            .trim()
            .parse::<i64>()
            .map(AttrValue::Int)
            .map_err(|_| format!("invalid integer value {text:?}")),
        AttrType::Float | AttrType::Double => text
            .trim()
            .parse::<f64>()
            .map(AttrValue::Float)
            .map_err(|_| format!("invalid floating-point value {text:?}")),
        AttrType::String => Ok(AttrValue::Str(text.to_string())),
    }
}
