//! Scene aggregate: type registry, hierarchy and bind targets

use crate::domain::arena::SceneArena;
use crate::domain::target::{BindTarget, BoundValue, NodeId};
use crate::domain::types::TypeRegistry;

/// Rendering of `BoundValue::Absent`.
pub const ABSENT: &str = "none";
/// Prefix of rendered asset references.
pub const ASSET_PREFIX: &str = "asset:";

/// Everything needed to bind the scripts of one scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub types: TypeRegistry,
    pub hierarchy: SceneArena,
    pub targets: Vec<BindTarget>,
}

impl Scene {
    /// Indices of targets whose type carries the eligibility marker.
    pub fn bind_targets(&self) -> Vec<usize> {
        self.targets
            .iter()
            .enumerate()
            .filter(|(_, t)| self.types.is_bindable(&t.type_name))
            .map(|(i, _)| i)
            .collect()
    }

    /// Human-readable form of a field value.
    pub fn describe(&self, value: &BoundValue) -> String {
        match value {
            BoundValue::Absent => ABSENT.to_string(),
            BoundValue::Node(node) => self.node_path(*node),
            BoundValue::Component(c) => format!("{}#{}", self.node_path(c.node), c.type_name),
            BoundValue::Asset(a) => format!("{ASSET_PREFIX}{}", a.path),
            BoundValue::Stored(s) => s.clone(),
        }
    }

    /// Inverse of `describe` for values read from a document.
    pub fn parse_value(text: &str) -> BoundValue {
        if text == ABSENT {
            BoundValue::Absent
        } else {
            BoundValue::Stored(text.to_string())
        }
    }

    fn node_path(&self, node: NodeId) -> String {
        self.hierarchy
            .path_of(node)
            .unwrap_or_else(|| ABSENT.to_string())
    }
}
