//! Field classification: which fields bind, under which key, in which direction

use tracing::{debug, trace};

use crate::domain::field::{BindableField, FieldDecl, FieldKeyMap};
use crate::domain::options::BindOptions;
use crate::domain::types::{IgnoreRule, TypeRegistry};

/// Classified fields of one type, split by search direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindPlan {
    /// Fields resolved against the subtree below the target
    pub descendants: FieldKeyMap,
    /// Fields resolved against the target's ancestor chain
    pub ancestors: FieldKeyMap,
}

impl BindPlan {
    pub fn is_empty(&self) -> bool {
        self.descendants.is_empty() && self.ancestors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.descendants.len() + self.ancestors.len()
    }

    /// Asset fields from both directions; ancestor entries win on equal keys.
    ///
    /// An empty suffix marks no field as an asset field.
    pub fn asset_fields(&self, options: &BindOptions) -> FieldKeyMap {
        if options.asset_suffix.is_empty() {
            return FieldKeyMap::new();
        }
        let mut fields = self.descendants.with_key_suffix(&options.asset_suffix);
        fields.extend(self.ancestors.with_key_suffix(&options.asset_suffix));
        fields
    }
}

/// Classifies every field declared over the type's base chain.
///
/// Unknown types and types without eligible fields give an empty plan.
pub fn classify(types: &TypeRegistry, type_name: &str, options: &BindOptions) -> BindPlan {
    let mut plan = BindPlan::default();
    let ignore_rule = types.ignore_rule(type_name);

    for (declaring_type, decl) in types.fields(type_name) {
        if is_ignored(decl, ignore_rule) {
            trace!(field = %decl.name, "ignored");
            continue;
        }

        let field = BindableField {
            declaring_type: declaring_type.to_string(),
            field_type: decl.field_type.clone(),
            raw_name: decl.name.clone(),
            key: bind_key(decl, options),
            search_parent: decl.bind.as_ref().is_some_and(|b| b.search_parent),
            explicit_name: decl
                .bind
                .as_ref()
                .and_then(|b| b.name.clone())
                .filter(|n| !n.is_empty()),
        };

        if field.search_parent {
            plan.ancestors.insert(field);
        } else {
            plan.descendants.insert(field);
        }
    }

    debug!(
        type_name,
        descendants = plan.descendants.len(),
        ancestors = plan.ancestors.len(),
        "classified"
    );
    plan
}

fn is_ignored(decl: &FieldDecl, ignore_rule: Option<&IgnoreRule>) -> bool {
    if !decl.field_type.is_bindable() || decl.ignore {
        return true;
    }
    ignore_rule.is_some_and(|rule| rule.ignores(&decl.name))
}

/// Lowercase lookup key of a field.
///
/// A non-empty explicit name wins. Otherwise the field name is used, minus a
/// leading private prefix when the name is longer than two characters.
pub fn bind_key(decl: &FieldDecl, options: &BindOptions) -> String {
    if let Some(name) = decl.bind.as_ref().and_then(|b| b.name.as_deref()) {
        if !name.is_empty() {
            return name.to_lowercase();
        }
    }

    let raw = decl.name.as_str();
    let name = match raw.strip_prefix(options.private_prefix) {
        Some(rest) if raw.chars().count() > 2 => rest,
        _ => raw,
    };
    name.to_lowercase()
}
