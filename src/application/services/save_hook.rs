//! Save hook: binds every eligible script of a scene before it is written

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::AutoBinder;
use crate::domain::{BindOptions, Scene};
use crate::infrastructure::traits::AssetStore;

/// Runs the binder over a scene as part of a save.
pub struct SaveHook {
    store: Arc<dyn AssetStore>,
    options: BindOptions,
}

impl SaveHook {
    pub fn new(store: Arc<dyn AssetStore>, options: BindOptions) -> Self {
        Self { store, options }
    }

    /// Binds all eligible targets of `scene` and passes `paths` through unchanged.
    ///
    /// Each save uses a fresh binder, so the asset index reflects the store
    /// at the time of the save.
    #[instrument(level = "debug", skip_all, fields(paths = paths.len()))]
    pub fn on_will_save(&self, scene: &mut Scene, paths: Vec<String>) -> Vec<String> {
        let targets = scene.bind_targets();
        let mut binder = AutoBinder::new(self.store.clone(), self.options.clone());

        for i in targets {
            let target = &mut scene.targets[i];
            if let Some(node) = scene.hierarchy.path_of(target.node) {
                debug!("bind target {}@{}", target.type_name, node);
            }
            binder.bind(&scene.types, &scene.hierarchy, target);
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BindTarget, BoundValue, FieldDecl, TypeDecl};
    use crate::infrastructure::traits::InMemoryAssetStore;

    #[test]
    fn given_scene_when_saving_then_binds_marked_targets_and_returns_paths() {
        let mut scene = Scene::default();
        scene
            .types
            .register(TypeDecl::bindable("View").field(FieldDecl::object("label")))
            .unwrap();
        scene
            .types
            .register(TypeDecl::new("Plain").field(FieldDecl::object("label")))
            .unwrap();
        let root = scene.hierarchy.insert_node("Root", vec![], None);
        let label = scene.hierarchy.insert_node("Label", vec![], Some(root));
        scene.targets.push(BindTarget::new("View", root));
        scene.targets.push(BindTarget::new("Plain", root));
        let hook = SaveHook::new(Arc::new(InMemoryAssetStore::new()), BindOptions::default());

        let paths = hook.on_will_save(&mut scene, vec!["Scenes/main.toml".into()]);

        assert_eq!(paths, vec!["Scenes/main.toml".to_string()]);
        assert_eq!(scene.targets[0].get("label"), Some(&BoundValue::Node(label)));
        assert!(scene.targets[1].fields.is_empty());
    }
}
