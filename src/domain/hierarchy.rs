//! Read-only view of a scene graph consumed by the binder

use crate::domain::target::{ComponentRef, NodeId};

/// Tree of named nodes with attached components.
///
/// The binder only reads names, links and components through this trait;
/// any host scene graph can be bound by implementing it.
pub trait Hierarchy {
    fn name(&self, node: NodeId) -> Option<&str>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children in declaration order.
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Type names of all components attached to the node.
    fn components(&self, node: NodeId) -> &[String];

    /// Component of the requested type on the node, if attached.
    fn component(&self, node: NodeId, type_name: &str) -> Option<ComponentRef> {
        self.components(node)
            .iter()
            .any(|c| c == type_name)
            .then(|| ComponentRef {
                node,
                type_name: type_name.to_string(),
            })
    }

    fn has_components(&self, node: NodeId) -> bool {
        !self.components(node).is_empty()
    }
}
