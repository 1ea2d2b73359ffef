//! TOML scene document
//!
//! ```toml
//! component_types = ["Rigidbody"]
//!
//! [[types]]
//! name = "PlayerView"
//! auto_bind = true
//! ignore_rules = ["^debug"]
//!
//! [[types.fields]]
//! name = "_weapon"
//! type = "GameObject"
//!
//! [[types.fields]]
//! name = "canvas"
//! type = "GameObject"
//! bind = { search_parent = true }
//!
//! [[nodes]]
//! name = "Player"
//!
//! [[nodes.scripts]]
//! type = "PlayerView"
//!
//! [[nodes.children]]
//! name = "Weapon"
//! components = ["Rigidbody"]
//! ```
//!
//! Scripts attached to a node also count as components of that node.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::field::{BindAttr, FieldDecl, FieldType, OBJECT_TYPE_NAME};
use crate::domain::scene::Scene;
use crate::domain::target::{BindTarget, NodeId};
use crate::domain::types::{TypeDecl, TypeRegistry};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDocument {
    /// Component types known besides the ones attached somewhere in the scene
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub component_types: Vec<String>,
    pub types: Vec<TypeSpec>,
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: String,
    #[serde(default)]
    pub auto_bind: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Regex patterns; the first valid one is the type's ignore rule
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_rules: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub ignore: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<BindSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub search_parent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<ScriptSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSpec {
    #[serde(rename = "type")]
    pub type_name: String,
    /// Field values rendered as by `Scene::describe`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl SceneDocument {
    pub fn parse(content: &str) -> DomainResult<Self> {
        toml::from_str(content).map_err(|e| DomainError::InvalidScene {
            message: e.to_string(),
        })
    }

    pub fn to_toml(&self) -> DomainResult<String> {
        toml::to_string_pretty(self).map_err(|e| DomainError::InvalidScene {
            message: e.to_string(),
        })
    }

    /// Every type name usable as a component: declared, attached, or scripted.
    fn component_type_names(&self) -> BTreeSet<&str> {
        let mut names: BTreeSet<&str> = self.component_types.iter().map(String::as_str).collect();
        let mut stack: Vec<&NodeSpec> = self.nodes.iter().collect();
        while let Some(node) = stack.pop() {
            names.extend(node.components.iter().map(String::as_str));
            names.extend(node.scripts.iter().map(|s| s.type_name.as_str()));
            stack.extend(node.children.iter());
        }
        names
    }

    fn build_registry(&self) -> DomainResult<TypeRegistry> {
        let components = self.component_type_names();
        let field_type = |name: &str| {
            if name == OBJECT_TYPE_NAME {
                FieldType::Object
            } else if components.contains(name) {
                FieldType::Component(name.to_string())
            } else {
                FieldType::Value(name.to_string())
            }
        };

        let decls = self.types.iter().map(|spec| {
            let mut decl = TypeDecl::new(&spec.name);
            decl.auto_bind = spec.auto_bind;
            decl.base = spec.base.clone();
            for pattern in &spec.ignore_rules {
                decl = decl.ignore_pattern(pattern);
            }
            for f in &spec.fields {
                let mut field = FieldDecl::new(&f.name, field_type(&f.type_name));
                field.ignore = f.ignore;
                field.bind = f.bind.as_ref().map(|b| BindAttr {
                    name: b.name.clone(),
                    search_parent: b.search_parent,
                });
                decl = decl.field(field);
            }
            decl
        });

        TypeRegistry::from_decls(decls)
    }

    /// Builds the in-memory scene. Targets are listed in pre-order of their nodes.
    pub fn to_scene(&self) -> DomainResult<Scene> {
        let mut scene = Scene {
            types: self.build_registry()?,
            ..Scene::default()
        };

        let mut stack: Vec<(&NodeSpec, Option<NodeId>)> =
            self.nodes.iter().rev().map(|n| (n, None)).collect();

        while let Some((spec, parent)) = stack.pop() {
            let idx = scene
                .hierarchy
                .insert_node(&spec.name, spec.components.clone(), parent);

            for script in &spec.scripts {
                let decl_known = scene.types.contains(&script.type_name);
                if !decl_known {
                    return Err(DomainError::UnknownScriptType {
                        node: scene.hierarchy.path_of(idx).unwrap_or_default(),
                        type_name: script.type_name.clone(),
                    });
                }
                scene.hierarchy.attach(idx, &script.type_name);

                let mut target = BindTarget::new(&script.type_name, idx);
                for (field, text) in &script.fields {
                    let declared = scene
                        .types
                        .fields(&script.type_name)
                        .iter()
                        .any(|(_, f)| &f.name == field);
                    if !declared {
                        return Err(DomainError::UnknownField {
                            type_name: script.type_name.clone(),
                            field: field.clone(),
                        });
                    }
                    target.fields.insert(field.clone(), Scene::parse_value(text));
                }
                scene.targets.push(target);
            }

            for child in spec.children.iter().rev() {
                stack.push((child, Some(idx)));
            }
        }

        Ok(scene)
    }

    /// Writes the scene's current target values back into the script entries.
    ///
    /// The scene must have been built from this document.
    pub fn apply_values(&mut self, scene: &Scene) {
        let mut targets = scene.targets.iter();
        for node in &mut self.nodes {
            write_values(node, &mut targets, scene);
        }
    }
}

fn write_values<'a>(
    node: &mut NodeSpec,
    targets: &mut impl Iterator<Item = &'a BindTarget>,
    scene: &Scene,
) {
    for script in &mut node.scripts {
        if let Some(target) = targets.next() {
            script.fields = target
                .fields
                .iter()
                .map(|(name, value)| (name.clone(), scene.describe(value)))
                .collect();
        }
    }
    for child in &mut node.children {
        write_values(child, targets, scene);
    }
}
