//! Configuration store
//!
//! [`ConfigStore`] is the single owner of the current [`ConfigDocument`] and
//! the custom override map. Every change goes through a named operation which
//! swaps in a new document snapshot, persists it, and notifies subscribers.
//!
//! Update operations replace the targeted table wholesale. Callers that want
//! a partial update copy the previous table and edit it; leaving a key out is
//! how a property gets deleted.

use std::sync::Arc;

use onestyle_core::{
    check_scale, ColorScale, ConfigDocument, DocumentError, HslaAdjustment, OverrideMap,
    PropertyMap, Scope, STANDARD_WEIGHTS,
};
use serde_json::Value;
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, warn};

use crate::defaults::DefaultPreset;
use crate::storage::{namespaced_key, Storage};
use crate::transfer;
use crate::ImportError;

new_key_type! {
    /// Handle returned by [`ConfigStore::subscribe`]
    pub struct SubscriptionId;
}

/// Change callback, invoked after every mutation.
pub type Subscriber = Box<dyn FnMut(&ConfigDocument, &OverrideMap)>;

/// Storage keys and default document selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Prefix applied to every storage key (`"{namespace}_{key}"`).
    pub namespace: String,
    pub config_key: String,
    pub overrides_key: String,
    pub preset: DefaultPreset,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: "onestyle".to_string(),
            config_key: "theme_config".to_string(),
            overrides_key: "custom_overrides".to_string(),
            preset: DefaultPreset::default(),
        }
    }
}

/// Pick the starting document: the persisted one if it decodes, else
/// `defaults`.
///
/// Malformed persisted data is discarded with a warning, never surfaced.
pub fn initialize(persisted: Option<&str>, defaults: &ConfigDocument) -> ConfigDocument {
    let Some(text) = persisted else {
        return defaults.clone();
    };
    match transfer::import(text) {
        Ok(doc) => doc,
        Err(err) => {
            warn!("discarding malformed persisted configuration: {}", err);
            defaults.clone()
        }
    }
}

fn initialize_overrides(persisted: Option<&str>) -> OverrideMap {
    let Some(text) = persisted else {
        return OverrideMap::new();
    };
    serde_json::from_str(text).unwrap_or_else(|err| {
        warn!("discarding malformed persisted overrides: {}", err);
        OverrideMap::new()
    })
}

pub struct ConfigStore {
    storage: Box<dyn Storage>,
    config: StoreConfig,
    defaults: Arc<ConfigDocument>,
    document: Arc<ConfigDocument>,
    overrides: Arc<OverrideMap>,
    subscribers: SlotMap<SubscriptionId, Subscriber>,
}

impl ConfigStore {
    /// Open a store, loading state from `storage` or falling back to the
    /// configured default preset.
    pub fn open(storage: impl Storage + 'static, config: StoreConfig) -> Self {
        let defaults = config.preset.document();
        Self::with_defaults(storage, config, defaults)
    }

    /// Open a store with an explicit default document.
    pub fn with_defaults(
        storage: impl Storage + 'static,
        config: StoreConfig,
        defaults: ConfigDocument,
    ) -> Self {
        let config_key = namespaced_key(&config.namespace, &config.config_key);
        let overrides_key = namespaced_key(&config.namespace, &config.overrides_key);

        let read = |key: &str| match storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("ConfigStore: failed to read `{}`: {}", key, err);
                None
            }
        };
        let document = initialize(read(&config_key).as_deref(), &defaults);
        let overrides = initialize_overrides(read(&overrides_key).as_deref());

        debug!(
            "ConfigStore::open - `{}` with {} components, {} scopes, {} overrides",
            document.theme.name,
            document.components.len(),
            document.scopes.len(),
            overrides.len()
        );

        Self {
            storage: Box::new(storage),
            config,
            defaults: Arc::new(defaults),
            document: Arc::new(document),
            overrides: Arc::new(overrides),
            subscribers: SlotMap::with_key(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The current document.
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// A shared handle to the current document that later mutations leave
    /// untouched.
    pub fn snapshot(&self) -> Arc<ConfigDocument> {
        Arc::clone(&self.document)
    }

    pub fn overrides(&self) -> &OverrideMap {
        &self.overrides
    }

    pub fn overrides_snapshot(&self) -> Arc<OverrideMap> {
        Arc::clone(&self.overrides)
    }

    /// The built-in document used by [`reset_to_default`](Self::reset_to_default).
    pub fn defaults(&self) -> &ConfigDocument {
        &self.defaults
    }

    // ========== Subscriptions ==========

    /// Register a callback invoked after every mutation.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&ConfigDocument, &OverrideMap) + 'static,
    ) -> SubscriptionId {
        self.subscribers.insert(Box::new(callback))
    }

    /// Remove a callback. Returns false if it was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    // ========== Colors ==========

    /// Replace the scale of brand color `color`.
    ///
    /// The scale must define every standard weight; extra weights are kept.
    pub fn update_color_scale(
        &mut self,
        color: &str,
        scale: ColorScale,
    ) -> Result<(), DocumentError> {
        check_scale(color, &scale)?;
        if self.document.colors.brand.get(color) == Some(&scale) {
            return Ok(());
        }
        self.mutate("update_color_scale", color, |doc| {
            doc.colors.brand.insert(color.to_string(), scale);
        });
        Ok(())
    }

    /// Add or replace variation `name` of brand slot `slot`.
    ///
    /// Names that are scale weights (`500`, or any weight the slot's scale
    /// defines) would shadow the scale's custom property and are rejected.
    pub fn create_color_variation(
        &mut self,
        slot: &str,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DocumentError> {
        let reserved = STANDARD_WEIGHTS.contains(&name)
            || self
                .document
                .colors
                .brand
                .get(slot)
                .is_some_and(|scale| scale.contains_key(name));
        if reserved {
            return Err(DocumentError::ReservedVariation {
                slot: slot.to_string(),
                name: name.to_string(),
            });
        }

        let value = Value::String(value.into());
        let unchanged = self
            .document
            .color_variations
            .get(slot)
            .and_then(|v| v.get(name))
            == Some(&value);
        if unchanged {
            return Ok(());
        }
        self.mutate("create_color_variation", name, |doc| {
            doc.color_variations
                .entry(slot.to_string())
                .or_default()
                .insert(name.to_string(), value);
        });
        Ok(())
    }

    /// Remove variation `name` of `slot`. A slot left without variations is
    /// removed as well.
    pub fn delete_color_variation(&mut self, slot: &str, name: &str) -> bool {
        let present = self
            .document
            .color_variations
            .get(slot)
            .is_some_and(|v| v.contains_key(name));
        if !present {
            return false;
        }
        self.mutate("delete_color_variation", name, |doc| {
            let now_empty = match doc.color_variations.get_mut(slot) {
                Some(variations) => {
                    variations.shift_remove(name);
                    variations.is_empty()
                }
                None => false,
            };
            if now_empty {
                doc.color_variations.shift_remove(slot);
            }
        });
        true
    }

    /// Set or clear the color book's base color.
    pub fn set_color_book_base(&mut self, base: Option<String>) {
        if self.document.color_book.base == base {
            return;
        }
        self.mutate("set_color_book_base", "base", |doc| {
            doc.color_book.base = base;
        });
    }

    pub fn create_color_preset(&mut self, name: &str, adjustment: HslaAdjustment) {
        if self.document.color_book.presets.get(name) == Some(&adjustment) {
            return;
        }
        self.mutate("create_color_preset", name, |doc| {
            doc.color_book.presets.insert(name.to_string(), adjustment);
        });
    }

    pub fn delete_color_preset(&mut self, name: &str) -> bool {
        if !self.document.color_book.presets.contains_key(name) {
            return false;
        }
        self.mutate("delete_color_preset", name, |doc| {
            doc.color_book.presets.shift_remove(name);
        });
        true
    }

    // ========== Components ==========

    /// Replace component `name`'s property table wholesale.
    pub fn update_component(&mut self, name: &str, styles: PropertyMap) {
        if self.document.components.get(name) == Some(&styles) {
            return;
        }
        self.mutate("update_component", name, |doc| {
            doc.components.insert(name.to_string(), styles);
        });
    }

    pub fn delete_component(&mut self, name: &str) -> bool {
        if !self.document.components.contains_key(name) {
            return false;
        }
        self.mutate("delete_component", name, |doc| {
            doc.components.shift_remove(name);
        });
        true
    }

    /// Copy in every default component missing from the current document.
    ///
    /// Existing components are never touched. Returns the names added.
    pub fn sync_new_components(&mut self) -> Vec<String> {
        let missing: Vec<(String, PropertyMap)> = self
            .defaults
            .components
            .iter()
            .filter(|(name, _)| !self.document.components.contains_key(*name))
            .map(|(name, styles)| (name.clone(), styles.clone()))
            .collect();
        if missing.is_empty() {
            return Vec::new();
        }

        let added: Vec<String> = missing.iter().map(|(name, _)| name.clone()).collect();
        self.mutate("sync_new_components", &added.join(", "), |doc| {
            doc.components.extend(missing);
        });
        added
    }

    // ========== Scopes ==========

    /// Create scope `name` with `properties` as its base, overwriting any
    /// existing scope of that name.
    pub fn create_new_scope(&mut self, name: &str, properties: PropertyMap) {
        let scope = Scope::new(properties);
        if self.document.scopes.get(name) == Some(&scope) {
            return;
        }
        self.mutate("create_new_scope", name, |doc| {
            doc.scopes.insert(name.to_string(), scope);
        });
    }

    /// Replace scope `name`'s base properties wholesale, creating the scope if
    /// needed. Presets and metadata are kept.
    pub fn update_scope_base_properties(&mut self, name: &str, properties: PropertyMap) {
        let unchanged = self
            .document
            .scopes
            .get(name)
            .is_some_and(|s| s.base_properties.as_ref() == Some(&properties));
        if unchanged {
            return;
        }
        self.mutate("update_scope_base_properties", name, |doc| {
            doc.scopes.entry(name.to_string()).or_default().base_properties = Some(properties);
        });
    }

    /// Remove scope `name` together with its presets.
    ///
    /// Collections that list the scope keep the name; lookups skip it.
    pub fn delete_scope(&mut self, name: &str) -> bool {
        if !self.document.scopes.contains_key(name) {
            return false;
        }
        self.mutate("delete_scope", name, |doc| {
            doc.scopes.shift_remove(name);
        });
        true
    }

    /// Rename a scope in place. Fails if `from` is absent or `to` is taken.
    pub fn rename_scope(&mut self, from: &str, to: &str) -> bool {
        if from == to
            || !self.document.scopes.contains_key(from)
            || self.document.scopes.contains_key(to)
        {
            return false;
        }
        self.mutate("rename_scope", to, |doc| {
            if let Some((index, _, scope)) = doc.scopes.shift_remove_full(from) {
                doc.scopes.shift_insert(index, to.to_string(), scope);
            }
        });
        true
    }

    /// Create or replace preset `preset` of scope `scope`.
    pub fn set_scope_preset(&mut self, scope: &str, preset: &str, properties: PropertyMap) -> bool {
        let Some(current) = self.document.scopes.get(scope) else {
            return false;
        };
        if current.presets.get(preset) == Some(&properties) {
            return true;
        }
        self.mutate("set_scope_preset", preset, |doc| {
            if let Some(s) = doc.scopes.get_mut(scope) {
                s.presets.insert(preset.to_string(), properties);
            }
        });
        true
    }

    pub fn delete_scope_preset(&mut self, scope: &str, preset: &str) -> bool {
        let present = self
            .document
            .scopes
            .get(scope)
            .is_some_and(|s| s.presets.contains_key(preset));
        if !present {
            return false;
        }
        self.mutate("delete_scope_preset", preset, |doc| {
            if let Some(s) = doc.scopes.get_mut(scope) {
                s.presets.shift_remove(preset);
            }
        });
        true
    }

    // ========== Custom Overrides ==========

    pub fn add_custom_override(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        if self.overrides.get(property) == Some(&value) {
            return;
        }
        Arc::make_mut(&mut self.overrides).insert(property.to_string(), value);
        debug!("ConfigStore::add_custom_override - {}", property);
        self.persist_overrides();
        self.notify();
    }

    pub fn remove_custom_override(&mut self, property: &str) -> bool {
        if !self.overrides.contains_key(property) {
            return false;
        }
        Arc::make_mut(&mut self.overrides).shift_remove(property);
        debug!("ConfigStore::remove_custom_override - {}", property);
        self.persist_overrides();
        self.notify();
        true
    }

    // ========== Whole Document ==========

    /// Replace the document with the built-in default and clear all
    /// overrides. Irreversible; confirming with the user is the caller's job.
    pub fn reset_to_default(&mut self) {
        debug!("ConfigStore::reset_to_default");
        self.document = Arc::clone(&self.defaults);
        self.overrides = Arc::new(OverrideMap::new());
        self.persist_document();
        self.persist_overrides();
        self.notify();
    }

    /// The current document as indented JSON.
    pub fn export_config(&self) -> String {
        transfer::export(&self.document)
    }

    /// Replace the whole document with one parsed from `text`.
    ///
    /// On error nothing changes.
    pub fn import_config(&mut self, text: &str) -> Result<(), ImportError> {
        let doc = transfer::import(text).map_err(|err| {
            debug!("ConfigStore::import_config - rejected: {}", err);
            err
        })?;
        for problem in doc.validate() {
            warn!("imported configuration: {}", problem);
        }
        self.replace_document("import_config", doc);
        Ok(())
    }

    /// Replace the whole document.
    pub fn replace_document(&mut self, op: &str, doc: ConfigDocument) {
        debug!("ConfigStore::{} - replacing document", op);
        self.document = Arc::new(doc);
        self.persist_document();
        self.notify();
    }

    // ========== Internals ==========

    // Callers skip this when the operation would leave the document as is.

    fn mutate<R>(&mut self, op: &str, target: &str, f: impl FnOnce(&mut ConfigDocument) -> R) -> R {
        debug!("ConfigStore::{} - {}", op, target);
        let result = f(Arc::make_mut(&mut self.document));
        self.persist_document();
        self.notify();
        result
    }

    fn persist_document(&mut self) {
        let key = namespaced_key(&self.config.namespace, &self.config.config_key);
        match serde_json::to_string(&*self.document) {
            Ok(text) => self.write(&key, &text),
            Err(err) => warn!("ConfigStore: failed to serialize configuration: {}", err),
        }
    }

    fn persist_overrides(&mut self) {
        let key = namespaced_key(&self.config.namespace, &self.config.overrides_key);
        match serde_json::to_string(&*self.overrides) {
            Ok(text) => self.write(&key, &text),
            Err(err) => warn!("ConfigStore: failed to serialize overrides: {}", err),
        }
    }

    /// Persistence failures keep the in-memory state and are only logged.
    fn write(&mut self, key: &str, text: &str) {
        if let Err(err) = self.storage.set(key, text) {
            warn!("ConfigStore: failed to persist `{}`: {}", key, err);
        }
    }

    fn notify(&mut self) {
        let document: &ConfigDocument = &self.document;
        let overrides: &OverrideMap = &self.overrides;
        for (_, callback) in self.subscribers.iter_mut() {
            callback(document, overrides);
        }
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("config", &self.config)
            .field("document", &self.document)
            .field("overrides", &self.overrides)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
