//! Name-keyed hierarchy search: descendant pre-order walk and ancestor chain walk

use tracing::debug;

use crate::domain::field::{BindableField, FieldKeyMap, FieldType};
use crate::domain::hierarchy::Hierarchy;
use crate::domain::target::{BindTarget, BoundValue, NodeId};

/// Value a field receives when its key matches `node`.
///
/// Object fields get the node itself; component fields get the attached
/// component of their type, or `Absent`.
pub fn resolve<H: Hierarchy + ?Sized>(hierarchy: &H, node: NodeId, field: &BindableField) -> BoundValue {
    match &field.field_type {
        FieldType::Object => BoundValue::Node(node),
        FieldType::Component(type_name) => hierarchy
            .component(node, type_name)
            .map(BoundValue::Component)
            .unwrap_or(BoundValue::Absent),
        FieldType::Value(_) => BoundValue::Absent,
    }
}

/// Binds fields against the subtree below `root` in pre-order.
///
/// The first node whose lowercased name matches a key wins; the key is
/// consumed so later nodes with the same name are skipped. Returns the keys
/// that found no node.
pub fn bind_descendants<H: Hierarchy + ?Sized>(
    target: &mut BindTarget,
    hierarchy: &H,
    root: NodeId,
    mut remaining: FieldKeyMap,
) -> FieldKeyMap {
    let mut stack: Vec<NodeId> = hierarchy.children(root).iter().rev().copied().collect();

    while let Some(node) = stack.pop() {
        if remaining.is_empty() {
            break;
        }
        if let Some(name) = hierarchy.name(node) {
            bind_at(target, hierarchy, node, name, &mut remaining);
        }
        // Push children in reverse order for left-to-right traversal
        stack.extend(hierarchy.children(node).iter().rev().copied());
    }

    remaining
}

/// Binds fields against the ancestors of `root`, nearest first, up to the hierarchy root.
///
/// Returns the keys that found no ancestor.
pub fn bind_ancestors<H: Hierarchy + ?Sized>(
    target: &mut BindTarget,
    hierarchy: &H,
    root: NodeId,
    mut remaining: FieldKeyMap,
) -> FieldKeyMap {
    let mut current = hierarchy.parent(root);

    while let Some(node) = current {
        if remaining.is_empty() {
            break;
        }
        if let Some(name) = hierarchy.name(node) {
            bind_at(target, hierarchy, node, name, &mut remaining);
        }
        current = hierarchy.parent(node);
    }

    remaining
}

fn bind_at<H: Hierarchy + ?Sized>(
    target: &mut BindTarget,
    hierarchy: &H,
    node: NodeId,
    name: &str,
    remaining: &mut FieldKeyMap,
) {
    if let Some(field) = remaining.take(&name.to_lowercase()) {
        let value = resolve(hierarchy, node, &field);
        debug!(
            field = %field.raw_name,
            node = name,
            absent = value.is_absent(),
            "bound"
        );
        target.assign(&field, value);
    }
}
