//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::services::{AutoBinder, SaveHook, SceneService};
use crate::config::Settings;
use crate::infrastructure::traits::{AssetStore, FileSystem, FsAssetStore, RealFileSystem};

/// Container holding the settings and I/O dependencies services are built from.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Asset store abstraction
    pub assets: Arc<dyn AssetStore>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    ///
    /// Assets are read from the configured asset directory, resolved against
    /// `project_dir`, unless `assets_dir` overrides it.
    pub fn new(settings: Settings, project_dir: &Path, assets_dir: Option<PathBuf>) -> Self {
        let assets_dir = assets_dir.unwrap_or_else(|| settings.resolved_assets_dir(project_dir));
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(FsAssetStore::new(assets_dir)),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            assets,
        }
    }

    pub fn scene_service(&self) -> SceneService {
        SceneService::new(self.fs.clone())
    }

    pub fn auto_binder(&self) -> AutoBinder {
        AutoBinder::new(self.assets.clone(), self.settings.bind_options())
    }

    pub fn save_hook(&self) -> SaveHook {
        SaveHook::new(self.assets.clone(), self.settings.bind_options())
    }
}
