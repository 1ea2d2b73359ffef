use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree;

use crate::domain::SceneArena;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn label(arena: &SceneArena, idx: Index) -> String {
    match arena.get_node(idx) {
        Some(node) if node.components.is_empty() => node.name.clone(),
        Some(node) => format!("{} [{}]", node.name, node.components.iter().join(", ")),
        None => String::new(),
    }
}

fn build_tree(arena: &SceneArena, node_idx: Index) -> Tree<String> {
    let mut tree = Tree::new(label(arena, node_idx));
    if let Some(node) = arena.get_node(node_idx) {
        for &child_idx in &node.children {
            tree.push(build_tree(arena, child_idx));
        }
    }
    tree
}

// A forest with several roots hangs below a synthetic "(scene)" node
impl TreeNodeConvert for SceneArena {
    fn to_tree_string(&self) -> Tree<String> {
        match self.roots() {
            [] => Tree::new("Empty scene".to_string()),
            [root] => build_tree(self, *root),
            roots => Tree::new("(scene)".to_string())
                .with_leaves(roots.iter().map(|&r| build_tree(self, r))),
        }
    }
}
