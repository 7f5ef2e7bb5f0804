//! Persistent value tree edited by the request editor
//!
//! Sequences and mappings are reference-counted. Editing goes through
//! [`Value::with_set`], which returns a new root and clones only the nodes along the
//! edited path; every other subtree stays shared with the previous root, and the
//! previous root itself is never mutated.
//!
//! A field that is *absent* has no key in its parent mapping. At the edit API this is
//! spelled `None`. Mappings keep their keys in insertion order.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub type Map = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// Unsigned values above `i64::MAX`; smaller ones are normalised to `Int`.
    Uint(u64),
    Float(f64),
    String(String),
    List(Arc<Vec<Value>>),
    Map(Arc<Map>),
}

impl Value {
    pub fn empty_map() -> Self {
        Value::Map(Arc::new(Map::new()))
    }

    pub fn empty_list() -> Self {
        Value::List(Arc::new(Vec::new()))
    }

    pub fn from_u64(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Uint(v),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Look up the value at `path`. `None` means absent (or the path does not fit).
    pub fn get(&self, path: &ValuePath) -> Option<&Value> {
        let mut node = self;
        for seg in path.segments() {
            node = match (seg, node) {
                (PathSegment::Field(name), Value::Map(m)) => m.get(name)?,
                (PathSegment::Index(i), Value::List(l)) => l.get(*i)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Return a new root with the value at `path` replaced.
    ///
    /// `None` removes a mapping key (absent) or splices a sequence element. Missing or
    /// `null` intermediate nodes become `{}` for field segments and `[]` for index
    /// segments. An empty path replaces the root; `None` there yields `null`.
    pub fn with_set(&self, path: &ValuePath, new: Option<Value>) -> Value {
        let mut root = self.clone();
        set_in(&mut root, path.segments(), new);
        root
    }

    /// Pretty JSON text of this tree.
    pub fn to_pretty_text(&self) -> String {
        serde_json::to_string_pretty(&serde_json::Value::from(self))
            .unwrap_or_else(|_| "null".to_string())
    }

    /// Number of nodes in the tree, including the root.
    pub fn node_count(&self) -> usize {
        match self {
            Value::List(l) => 1 + l.iter().map(Value::node_count).sum::<usize>(),
            Value::Map(m) => 1 + m.values().map(Value::node_count).sum::<usize>(),
            _ => 1,
        }
    }
}

fn set_in(node: &mut Value, segments: &[PathSegment], new: Option<Value>) {
    let Some((first, rest)) = segments.split_first() else {
        *node = new.unwrap_or(Value::Null);
        return;
    };

    match first {
        PathSegment::Field(name) => {
            if !matches!(node, Value::Map(_)) {
                if new.is_none() && rest.is_empty() {
                    return;
                }
                *node = Value::empty_map();
            }
            let Value::Map(map) = node else { return };
            let map = Arc::make_mut(map);
            if rest.is_empty() {
                match new {
                    Some(v) => {
                        map.insert(name.clone(), v);
                    }
                    None => {
                        map.shift_remove(name);
                    }
                }
            } else {
                if new.is_none() && !map.contains_key(name) {
                    return;
                }
                let child = map.entry(name.clone()).or_insert(Value::Null);
                set_in(child, rest, new);
            }
        }
        PathSegment::Index(i) => {
            if !matches!(node, Value::List(_)) {
                if new.is_none() && rest.is_empty() {
                    return;
                }
                *node = Value::empty_list();
            }
            let Value::List(list) = node else { return };
            let list = Arc::make_mut(list);
            if rest.is_empty() {
                match new {
                    Some(v) if *i < list.len() => list[*i] = v,
                    Some(v) => list.push(v),
                    None if *i < list.len() => {
                        list.remove(*i);
                    }
                    None => {}
                }
            } else if let Some(child) = list.get_mut(*i) {
                set_in(child, rest, new);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// JSON conversion
// ─────────────────────────────────────────────────────────────────

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Uint(u) => serde_json::Value::from(*u),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(l) => serde_json::Value::Array(l.iter().map(Into::into).collect()),
            Value::Map(m) => serde_json::Value::Object(
                m.iter().map(|(k, v)| (k.clone(), v.into())).collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(a) => {
                Value::List(Arc::new(a.into_iter().map(Value::from).collect()))
            }
            serde_json::Value::Object(o) => {
                Value::Map(Arc::new(o.into_iter().map(|(k, v)| (k, v.into())).collect()))
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_json::Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(Arc::new(map))
    }
}

impl From<Vec<Value>> for Value {
    fn from(list: Vec<Value>) -> Self {
        Value::List(Arc::new(list))
    }
}

// ─────────────────────────────────────────────────────────────────
// Paths
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Address of a node in a value tree, displayed as `/user/tags/0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValuePath(Vec<PathSegment>);

impl ValuePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.0.push(PathSegment::Field(name.into()));
        next
    }

    pub fn index(&self, i: usize) -> Self {
        let mut next = self.clone();
        next.0.push(PathSegment::Index(i));
        next
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.0.split_last()?;
        Some(Self(init.to_vec()))
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    pub fn starts_with(&self, prefix: &ValuePath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Where this path points after element `removed` of the sequence at `list` is
    /// spliced out. `None` if the path was inside the removed element.
    pub fn after_removal(&self, list: &ValuePath, removed: usize) -> Option<Self> {
        if !self.starts_with(list) || self.0.len() <= list.0.len() {
            return Some(self.clone());
        }
        let at = list.0.len();
        match self.0[at] {
            PathSegment::Index(i) if i == removed => None,
            PathSegment::Index(i) if i > removed => {
                let mut moved = self.clone();
                moved.0[at] = PathSegment::Index(i - 1);
                Some(moved)
            }
            _ => Some(self.clone()),
        }
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for seg in &self.0 {
            match seg {
                PathSegment::Field(name) => write!(f, "/{name}")?,
                PathSegment::Index(i) => write!(f, "/{i}")?,
            }
        }
        Ok(())
    }
}
