//! Bind targets and the values assigned into their fields

use std::collections::BTreeMap;

use generational_arena::Index;

use crate::domain::field::BindableField;

/// Handle of a node in a scene hierarchy.
pub type NodeId = Index;

/// A component of a given type attached to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    pub node: NodeId,
    pub type_name: String,
}

/// An external asset loaded as a given type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    /// Path of the asset inside the asset store
    pub path: String,
    pub type_name: String,
}

/// Value held by a target field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BoundValue {
    /// Explicitly nothing (a matched node without the requested component)
    #[default]
    Absent,
    /// The node itself, for object-handle fields
    Node(NodeId),
    Component(ComponentRef),
    Asset(AssetRef),
    /// Value read from a scene document, not rebound in this session
    Stored(String),
}

impl BoundValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, BoundValue::Absent)
    }
}

/// Script instance attached to a node whose fields get bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindTarget {
    /// Declared type, looked up in the type registry
    pub type_name: String,
    /// Node the script is attached to; the starting point of both searches
    pub node: NodeId,
    /// Current field values keyed by raw field name
    pub fields: BTreeMap<String, BoundValue>,
}

impl BindTarget {
    pub fn new(type_name: impl Into<String>, node: NodeId) -> Self {
        Self {
            type_name: type_name.into(),
            node,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, field: impl Into<String>, value: BoundValue) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&BoundValue> {
        self.fields.get(field)
    }

    /// Overwrites the field unconditionally, `Absent` included.
    pub fn assign(&mut self, field: &BindableField, value: BoundValue) {
        self.fields.insert(field.raw_name.clone(), value);
    }
}
