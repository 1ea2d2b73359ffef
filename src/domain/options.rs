//! Naming conventions used by classification and asset lookup

/// Conventions for deriving lookup keys and recognizing asset fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindOptions {
    /// Leading character marking a private field, stripped from the key
    pub private_prefix: char,
    /// Field-key suffix marking a field that wants a named external asset
    pub asset_suffix: String,
    /// File extension (without dot) of indexed assets
    pub asset_extension: String,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            private_prefix: '_',
            asset_suffix: "Prefab".into(),
            asset_extension: "prefab".into(),
        }
    }
}

impl BindOptions {
    /// Asset lookup name for an asset-field key: the key minus the suffix.
    pub fn asset_name<'a>(&self, key: &'a str) -> &'a str {
        let suffix = self.asset_suffix.to_lowercase();
        key.strip_suffix(suffix.as_str()).unwrap_or(key)
    }

    pub fn is_asset_key(&self, key: &str) -> bool {
        !self.asset_suffix.is_empty() && key.ends_with(&self.asset_suffix.to_lowercase())
    }
}
