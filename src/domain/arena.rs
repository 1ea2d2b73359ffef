//! Generational-arena scene forest implementing `Hierarchy`

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::hierarchy::Hierarchy;
use crate::domain::target::NodeId;

/// Node of a scene hierarchy.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Node name, matched case-insensitively against field keys
    pub name: String,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena
    pub children: Vec<Index>,
    /// Type names of attached components
    pub components: Vec<String>,
}

/// Arena-based scene forest.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// A scene may have several root nodes.
#[derive(Debug, Clone)]
pub struct SceneArena {
    /// Arena storage for all nodes
    arena: Arena<SceneNode>,
    /// Root nodes in insertion order
    roots: Vec<Index>,
}

impl Default for SceneArena {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    #[instrument(level = "trace", skip(self, components))]
    pub fn insert_node(
        &mut self,
        name: &str,
        components: Vec<String>,
        parent: Option<Index>,
    ) -> Index {
        let node = SceneNode {
            name: name.to_string(),
            parent,
            children: Vec::new(),
            components,
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.roots.push(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&SceneNode> {
        self.arena.get(idx)
    }

    /// Attaches a component unless one of the same type is already present.
    pub fn attach(&mut self, idx: Index, type_name: &str) {
        if let Some(node) = self.arena.get_mut(idx) {
            if !node.components.iter().any(|c| c == type_name) {
                node.components.push(type_name.to_string());
            }
        }
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Parent, grandparent, ... up to the root, excluding `idx`.
    pub fn ancestors(&self, idx: Index) -> AncestorIterator<'_> {
        AncestorIterator {
            arena: self,
            next: self.get_node(idx).and_then(|n| n.parent),
        }
    }

    /// Slash-separated path from the root, e.g. `Root/Child`.
    pub fn path_of(&self, idx: Index) -> Option<String> {
        let node = self.get_node(idx)?;
        let mut names: Vec<&str> = self.ancestors(idx).map(|(_, n)| n.name.as_str()).collect();
        names.reverse();
        names.push(node.name.as_str());
        Some(names.join("/"))
    }

    /// Finds a node by slash-separated path; the first child with a matching name wins.
    pub fn find_by_path(&self, path: &str) -> Option<Index> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let mut current = *self
            .roots
            .iter()
            .find(|&&r| self.get_node(r).is_some_and(|n| n.name == first))?;
        for segment in segments {
            let node = self.get_node(current)?;
            current = *node
                .children
                .iter()
                .find(|&&c| self.get_node(c).is_some_and(|n| n.name == segment))?;
        }
        Some(current)
    }
}

impl Hierarchy for SceneArena {
    fn name(&self, node: NodeId) -> Option<&str> {
        self.get_node(node).map(|n| n.name.as_str())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get_node(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.get_node(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    fn components(&self, node: NodeId) -> &[String] {
        self.get_node(node)
            .map(|n| n.components.as_slice())
            .unwrap_or(&[])
    }
}

pub struct AncestorIterator<'a> {
    arena: &'a SceneArena,
    next: Option<Index>,
}

impl<'a> Iterator for AncestorIterator<'a> {
    type Item = (Index, &'a SceneNode);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let node = self.arena.get_node(idx)?;
        self.next = node.parent;
        Some((idx, node))
    }
}
