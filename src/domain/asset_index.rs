//! Lowercase asset basename -> asset path lookup table

use std::collections::BTreeMap;
use std::path::Path;

/// Index of external assets by lowercased file stem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetIndex {
    entries: BTreeMap<String, String>,
}

impl AssetIndex {
    /// Indexes every path ending in `.{extension}`.
    ///
    /// Later paths with the same basename replace earlier ones.
    pub fn build<I, S>(paths: I, extension: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dotted = format!(".{extension}");
        let mut entries = BTreeMap::new();
        for path in paths {
            let path = path.as_ref();
            if !path.ends_with(&dotted) {
                continue;
            }
            if let Some(stem) = Path::new(path).file_stem() {
                entries.insert(stem.to_string_lossy().to_lowercase(), path.to_string());
            }
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
