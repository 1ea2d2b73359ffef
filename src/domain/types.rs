//! Type declarations: eligibility marker, fields, base type, ignore rules

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use tracing::warn;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::field::FieldDecl;

/// Predicate deciding per field name whether a field is excluded from binding.
#[derive(Clone)]
pub struct IgnoreRule {
    description: String,
    predicate: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

impl IgnoreRule {
    pub fn new(
        description: impl Into<String>,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Rule ignoring every field whose name matches `pattern`.
    pub fn from_pattern(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        Ok(Self::new(format!("/{pattern}/"), move |name| {
            regex.is_match(name)
        }))
    }

    pub fn ignores(&self, field_name: &str) -> bool {
        (self.predicate)(field_name)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IgnoreRule").field(&self.description).finish()
    }
}

/// Declaration of a script type.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    /// Class-level eligibility marker
    pub auto_bind: bool,
    pub base: Option<String>,
    pub fields: Vec<FieldDecl>,
    /// Candidate ignore rules; only the first one is used
    pub ignore_rules: Vec<IgnoreRule>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auto_bind: false,
            base: None,
            fields: Vec::new(),
            ignore_rules: Vec::new(),
        }
    }

    /// Shorthand for a type carrying the eligibility marker.
    pub fn bindable(name: impl Into<String>) -> Self {
        let mut decl = Self::new(name);
        decl.auto_bind = true;
        decl
    }

    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn ignore_rule(mut self, rule: IgnoreRule) -> Self {
        self.ignore_rules.push(rule);
        self
    }

    /// Adds a regex ignore rule. Malformed patterns are skipped.
    pub fn ignore_pattern(self, pattern: &str) -> Self {
        match IgnoreRule::from_pattern(pattern) {
            Ok(rule) => self.ignore_rule(rule),
            Err(e) => {
                warn!(type_name = %self.name, "skipping ignore rule {pattern:?}: {e}");
                self
            }
        }
    }
}

/// All known script types of a scene.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeDecl>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, decl: TypeDecl) -> DomainResult<()> {
        if self.types.contains_key(&decl.name) {
            return Err(DomainError::DuplicateType(decl.name));
        }
        self.types.insert(decl.name.clone(), decl);
        Ok(())
    }

    /// Builds a registry and checks every base chain.
    pub fn from_decls(decls: impl IntoIterator<Item = TypeDecl>) -> DomainResult<Self> {
        let mut registry = Self::new();
        for decl in decls {
            registry.register(decl)?;
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Every base type must exist and no chain may loop.
    pub fn validate(&self) -> DomainResult<()> {
        for decl in self.types.values() {
            let mut seen = HashSet::new();
            let mut current = decl;
            while let Some(base) = &current.base {
                if !seen.insert(current.name.as_str()) {
                    return Err(DomainError::CycleDetected(decl.name.clone()));
                }
                current = self
                    .types
                    .get(base)
                    .ok_or_else(|| DomainError::UnknownBaseType {
                        type_name: current.name.clone(),
                        base: base.clone(),
                    })?;
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypeDecl> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDecl> {
        self.types.values()
    }

    /// The type followed by its bases, most-derived first.
    pub fn lineage(&self, name: &str) -> Vec<&TypeDecl> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut next = self.types.get(name);
        while let Some(decl) = next {
            if !seen.insert(decl.name.as_str()) {
                break;
            }
            chain.push(decl);
            next = decl.base.as_deref().and_then(|b| self.types.get(b));
        }
        chain
    }

    /// True if the type or one of its bases carries the eligibility marker.
    pub fn is_bindable(&self, name: &str) -> bool {
        self.lineage(name).iter().any(|t| t.auto_bind)
    }

    /// All fields over the base chain, base type first, with their declaring type.
    pub fn fields(&self, name: &str) -> Vec<(&str, &FieldDecl)> {
        self.lineage(name)
            .into_iter()
            .rev()
            .flat_map(|t| t.fields.iter().map(move |f| (t.name.as_str(), f)))
            .collect()
    }

    /// First ignore rule found, searching from the most-derived type.
    pub fn ignore_rule(&self, name: &str) -> Option<&IgnoreRule> {
        self.lineage(name)
            .into_iter()
            .find_map(|t| t.ignore_rules.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TypeRegistry {
        TypeRegistry::from_decls([
            TypeDecl::bindable("ViewBase")
                .field(FieldDecl::object("_root"))
                .ignore_pattern("^debug"),
            TypeDecl::new("PlayerView")
                .extends("ViewBase")
                .field(FieldDecl::object("weapon")),
        ])
        .unwrap()
    }

    #[test]
    fn given_marker_on_base_when_checking_derived_then_bindable() {
        let registry = registry();
        assert!(registry.is_bindable("PlayerView"));
        assert!(!registry.is_bindable("Unknown"));
    }

    #[test]
    fn given_base_chain_when_listing_fields_then_base_first() {
        let registry = registry();
        let names: Vec<_> = registry
            .fields("PlayerView")
            .into_iter()
            .map(|(owner, f)| format!("{owner}.{}", f.name))
            .collect();
        assert_eq!(names, vec!["ViewBase._root", "PlayerView.weapon"]);
    }

    #[test]
    fn given_rule_on_base_when_resolving_then_inherited() {
        let registry = registry();
        let rule = registry.ignore_rule("PlayerView").unwrap();
        assert!(rule.ignores("debugLabel"));
        assert!(!rule.ignores("weapon"));
    }

    #[test]
    fn given_multiple_rules_when_resolving_then_first_wins() {
        let registry = TypeRegistry::from_decls([TypeDecl::bindable("A")
            .ignore_pattern("[unclosed")
            .ignore_pattern("^a")
            .ignore_pattern("^b")])
        .unwrap();

        let rule = registry.ignore_rule("A").unwrap();
        assert_eq!(rule.description(), "/^a/");
        assert!(!rule.ignores("bee"));
    }

    #[test]
    fn given_unknown_base_when_validating_then_errors() {
        let result = TypeRegistry::from_decls([TypeDecl::new("A").extends("Missing")]);
        assert!(matches!(
            result,
            Err(DomainError::UnknownBaseType { .. })
        ));
    }

    #[test]
    fn given_cyclic_bases_when_validating_then_errors() {
        let result = TypeRegistry::from_decls([
            TypeDecl::new("A").extends("B"),
            TypeDecl::new("B").extends("A"),
        ]);
        assert!(matches!(result, Err(DomainError::CycleDetected(_))));
    }

    #[test]
    fn given_duplicate_name_when_registering_then_errors() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeDecl::new("A")).unwrap();
        assert!(matches!(
            registry.register(TypeDecl::new("A")),
            Err(DomainError::DuplicateType(_))
        ));
    }
}
