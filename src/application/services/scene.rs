//! Scene document service
//!
//! Reads scene documents into bindable scenes and writes bound values back.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Scene, SceneDocument};
use crate::infrastructure::traits::FileSystem;

/// A scene together with the document it was built from.
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub document: SceneDocument,
    pub scene: Scene,
}

impl LoadedScene {
    /// Document text with the scene's current values applied.
    pub fn render(&mut self) -> ApplicationResult<String> {
        self.document.apply_values(&self.scene);
        Ok(self.document.to_toml()?)
    }
}

/// Service for loading and saving scene documents.
pub struct SceneService {
    fs: Arc<dyn FileSystem>,
}

impl SceneService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<LoadedScene> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::SceneNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read scene", path)?;
        let document = SceneDocument::parse(&content)?;
        let scene = document.to_scene()?;
        debug!(
            "loaded {} nodes, {} targets",
            scene.hierarchy.len(),
            scene.targets.len()
        );
        Ok(LoadedScene { document, scene })
    }

    #[instrument(level = "debug", skip(self, loaded))]
    pub fn save(&self, path: &Path, loaded: &mut LoadedScene) -> ApplicationResult<()> {
        let content = loaded.render()?;
        self.fs
            .write(path, &content)
            .with_path_context("write scene", path)
    }
}
