//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::{AssetRef, FieldType, OBJECT_TYPE_NAME};
use crate::util::path::normalize_path_separator;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;
}

/// External asset store: lists assets and loads them as a requested type.
pub trait AssetStore: Send + Sync {
    /// All known asset paths.
    fn asset_paths(&self) -> io::Result<Vec<String>>;

    /// Load the asset at `path` as `field_type`; None if it cannot be viewed as that type.
    fn load(&self, path: &str, field_type: &FieldType) -> Option<AssetRef>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Asset file content: the component types on the asset's root object.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AssetDocument {
    components: Vec<String>,
}

/// Asset store backed by a directory tree.
///
/// Paths are `/`-separated and relative to the root directory. Asset files
/// may be TOML with a `components` list; loading as a component type
/// succeeds only if that list names the type.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetStore for FsAssetStore {
    fn asset_paths(&self) -> io::Result<Vec<String>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                // The root itself must be readable; below it, bad entries are skipped
                Err(e) if e.depth() == 0 => {
                    return Err(io::Error::new(io::ErrorKind::Other, e.to_string()))
                }
                Err(e) => {
                    warn!("skipping asset entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let rel_path = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
            paths.push(normalize_path_separator(&rel_path.to_string_lossy()));
        }
        Ok(paths)
    }

    fn load(&self, path: &str, field_type: &FieldType) -> Option<AssetRef> {
        let full = self.root.join(path);
        if !full.is_file() {
            return None;
        }
        match field_type {
            FieldType::Object => Some(AssetRef {
                path: path.to_string(),
                type_name: OBJECT_TYPE_NAME.to_string(),
            }),
            FieldType::Component(type_name) => {
                let content = std::fs::read_to_string(&full).ok()?;
                let doc: AssetDocument = match toml::from_str(&content) {
                    Ok(doc) => doc,
                    Err(e) => {
                        debug!("asset {path} is not a component document: {e}");
                        return None;
                    }
                };
                doc.components.contains(type_name).then(|| AssetRef {
                    path: path.to_string(),
                    type_name: type_name.clone(),
                })
            }
            FieldType::Value(_) => None,
        }
    }
}

/// Asset store held in memory, listing assets in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssetStore {
    assets: Vec<(String, Vec<String>)>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an asset whose root object carries `components`.
    pub fn with_asset(mut self, path: impl Into<String>, components: &[&str]) -> Self {
        self.assets.push((
            path.into(),
            components.iter().map(|c| c.to_string()).collect(),
        ));
        self
    }
}

impl AssetStore for InMemoryAssetStore {
    fn asset_paths(&self) -> io::Result<Vec<String>> {
        Ok(self.assets.iter().map(|(p, _)| p.clone()).collect())
    }

    fn load(&self, path: &str, field_type: &FieldType) -> Option<AssetRef> {
        let (_, components) = self.assets.iter().rev().find(|(p, _)| p == path)?;
        let found = match field_type {
            FieldType::Object => true,
            FieldType::Component(type_name) => components.contains(type_name),
            FieldType::Value(_) => false,
        };
        found.then(|| AssetRef {
            path: path.to_string(),
            type_name: field_type.type_name().to_string(),
        })
    }
}
