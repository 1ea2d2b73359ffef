//! Auto-binding service
//!
//! Binds the fields of one target at a time: subtree search, ancestor search,
//! then named assets.

use std::sync::Arc;
use std::time::Instant;

use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

use crate::domain::{
    bind_ancestors, bind_descendants, classify, AssetIndex, BindOptions, BindTarget, BoundValue,
    FieldKeyMap, Hierarchy, TypeRegistry,
};
use crate::infrastructure::traits::AssetStore;

/// Binds targets against a hierarchy and an asset store.
///
/// The asset index is built on first use and kept for the binder's lifetime;
/// create a new binder to pick up asset changes.
pub struct AutoBinder {
    store: Arc<dyn AssetStore>,
    options: BindOptions,
    asset_index: Option<AssetIndex>,
}

impl AutoBinder {
    pub fn new(store: Arc<dyn AssetStore>, options: BindOptions) -> Self {
        Self {
            store,
            options,
            asset_index: None,
        }
    }

    /// Assigns every matching field of `target`.
    ///
    /// Targets of unknown or unmarked types are left untouched. Fields without
    /// a match keep their previous value.
    #[instrument(level = "debug", skip_all, fields(type_name = %target.type_name))]
    pub fn bind<H: Hierarchy + ?Sized>(
        &mut self,
        types: &TypeRegistry,
        hierarchy: &H,
        target: &mut BindTarget,
    ) {
        if !types.is_bindable(&target.type_name) {
            debug!("not bindable");
            return;
        }

        let plan = classify(types, &target.type_name, &self.options);
        if plan.is_empty() {
            debug!("no eligible fields");
            return;
        }

        let started = Instant::now();
        let asset_fields = plan.asset_fields(&self.options);
        let root = target.node;

        let unmatched = bind_descendants(target, hierarchy, root, plan.descendants);
        log_unmatched("descendant", &unmatched);
        let unmatched = bind_ancestors(target, hierarchy, root, plan.ancestors);
        log_unmatched("ancestor", &unmatched);

        if !asset_fields.is_empty() {
            self.bind_assets(target, asset_fields);
        }

        info!(
            "{} auto binding time {}ms",
            target.type_name,
            started.elapsed().as_millis()
        );
    }

    /// Assigns asset fields from the asset index. Misses leave the field as is.
    fn bind_assets(&mut self, target: &mut BindTarget, fields: FieldKeyMap) {
        let store = &self.store;
        let extension = &self.options.asset_extension;
        let index = self
            .asset_index
            .get_or_insert_with(|| build_index(store.as_ref(), extension));

        for (key, field) in fields {
            let name = self.options.asset_name(&key);
            let Some(path) = index.get(name) else {
                debug!(field = %field.raw_name, asset = name, "no asset");
                continue;
            };
            let value = store
                .load(path, &field.field_type)
                .map(BoundValue::Asset)
                .unwrap_or(BoundValue::Absent);
            debug!(field = %field.raw_name, path, absent = value.is_absent(), "bound asset");
            target.assign(&field, value);
        }
    }

    /// The cached asset index, building it if needed.
    pub fn asset_index(&mut self) -> &AssetIndex {
        let store = &self.store;
        let extension = &self.options.asset_extension;
        self.asset_index
            .get_or_insert_with(|| build_index(store.as_ref(), extension))
    }
}

fn build_index(store: &dyn AssetStore, extension: &str) -> AssetIndex {
    match store.asset_paths() {
        Ok(paths) => {
            let index = AssetIndex::build(paths, extension);
            debug!("indexed {} assets", index.len());
            index
        }
        Err(e) => {
            warn!("cannot list assets, asset fields stay unbound: {e}");
            AssetIndex::default()
        }
    }
}

fn log_unmatched(direction: &str, unmatched: &FieldKeyMap) {
    if !unmatched.is_empty() {
        debug!(
            "{} {} field(s) unmatched: {}",
            unmatched.len(),
            direction,
            unmatched.keys().join(", ")
        );
    }
}
