//! Field declarations and their classified, bindable form

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// Type name of the object-handle type.
pub const OBJECT_TYPE_NAME: &str = "GameObject";

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Handle to the node itself
    Object,
    /// A component type that can be attached to nodes
    Component(String),
    /// Anything else (numbers, strings, ...), never bound
    Value(String),
}

impl FieldType {
    pub fn type_name(&self) -> &str {
        match self {
            FieldType::Object => OBJECT_TYPE_NAME,
            FieldType::Component(name) | FieldType::Value(name) => name,
        }
    }

    pub fn is_bindable(&self) -> bool {
        !matches!(self, FieldType::Value(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Field-level bind annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindAttr {
    /// Explicit lookup name, overrides the field name
    pub name: Option<String>,
    /// Search the ancestor chain instead of the subtree
    pub search_parent: bool,
}

impl BindAttr {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            search_parent: false,
        }
    }

    pub fn parent() -> Self {
        Self {
            name: None,
            search_parent: true,
        }
    }
}

/// A field as declared on a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub field_type: FieldType,
    pub bind: Option<BindAttr>,
    /// Explicit ignore annotation
    pub ignore: bool,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            bind: None,
            ignore: false,
        }
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Object)
    }

    pub fn component(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Component(type_name.into()))
    }

    pub fn with_bind(mut self, bind: BindAttr) -> Self {
        self.bind = Some(bind);
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }
}

/// A field that survived classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindableField {
    pub declaring_type: String,
    pub field_type: FieldType,
    pub raw_name: String,
    /// Lowercase lookup key
    pub key: String,
    pub search_parent: bool,
    pub explicit_name: Option<String>,
}

/// Resolved key -> field. Keys are unique; a key is removed once resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldKeyMap {
    fields: BTreeMap<String, BindableField>,
}

impl FieldKeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts under the field's key, replacing an earlier field with the same key.
    pub fn insert(&mut self, field: BindableField) {
        self.fields.insert(field.key.clone(), field);
    }

    pub fn get(&self, key: &str) -> Option<&BindableField> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Removes and returns the field for `key`.
    pub fn take(&mut self, key: &str) -> Option<BindableField> {
        self.fields.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BindableField)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fields whose key ends with `suffix` (compared in lowercase).
    pub fn with_key_suffix(&self, suffix: &str) -> FieldKeyMap {
        let suffix = suffix.to_lowercase();
        let mut out = FieldKeyMap::new();
        for field in self.fields.values() {
            if field.key.ends_with(&suffix) {
                out.insert(field.clone());
            }
        }
        out
    }

    /// Adds all fields of `other`; entries of `other` win on equal keys.
    pub fn extend(&mut self, other: FieldKeyMap) {
        self.fields.extend(other.fields);
    }
}

impl IntoIterator for FieldKeyMap {
    type Item = (String, BindableField);
    type IntoIter = btree_map::IntoIter<String, BindableField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
