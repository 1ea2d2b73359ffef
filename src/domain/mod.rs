//! Domain layer: scene model and binding algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod asset_index;
pub mod classifier;
pub mod document;
pub mod error;
pub mod field;
pub mod hierarchy;
pub mod options;
pub mod scene;
pub mod target;
pub mod types;
pub mod walker;

pub use arena::{SceneArena, SceneNode};
pub use asset_index::AssetIndex;
pub use classifier::{bind_key, classify, BindPlan};
pub use document::SceneDocument;
pub use error::{DomainError, DomainResult};
pub use field::{BindAttr, BindableField, FieldDecl, FieldKeyMap, FieldType, OBJECT_TYPE_NAME};
pub use hierarchy::Hierarchy;
pub use options::BindOptions;
pub use scene::Scene;
pub use target::{AssetRef, BindTarget, BoundValue, ComponentRef, NodeId};
pub use types::{IgnoreRule, TypeDecl, TypeRegistry};
pub use walker::{bind_ancestors, bind_descendants, resolve};
