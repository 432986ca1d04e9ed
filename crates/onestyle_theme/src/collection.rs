//! Named collections of scope references
//!
//! Box groups, pattern libraries and 1Block collections are all the same
//! thing: a user-named list of item names, persisted under its own key,
//! independent of the configuration document. Items are references by name;
//! when the referenced scope is deleted the name stays in the collection and
//! lookups skip it.

use indexmap::IndexMap;
use onestyle_core::{ConfigDocument, Scope};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::Storage;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(default)]
    pub items: Vec<String>,
}

pub struct CollectionStore {
    storage: Box<dyn Storage>,
    key: String,
    collections: IndexMap<String, Collection>,
}

impl CollectionStore {
    /// Load the collections persisted under `key`. Unreadable or malformed
    /// data starts an empty set.
    pub fn open(storage: impl Storage + 'static, key: impl Into<String>) -> Self {
        let key = key.into();
        let collections = match storage.get(&key) {
            Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|err| {
                warn!("discarding malformed collections `{}`: {}", key, err);
                IndexMap::new()
            }),
            Ok(None) => IndexMap::new(),
            Err(err) => {
                warn!("CollectionStore: failed to read `{}`: {}", key, err);
                IndexMap::new()
            }
        };
        Self {
            storage: Box::new(storage),
            key,
            collections,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Create an empty collection. Returns false if the name is taken.
    pub fn create(&mut self, name: &str) -> bool {
        if self.collections.contains_key(name) {
            return false;
        }
        self.collections.insert(
            name.to_string(),
            Collection {
                name: name.to_string(),
                items: Vec::new(),
            },
        );
        self.commit("create", name);
        true
    }

    pub fn delete(&mut self, name: &str) -> bool {
        if self.collections.shift_remove(name).is_none() {
            return false;
        }
        self.commit("delete", name);
        true
    }

    /// Rename a collection in place. Fails if `from` is absent or `to` is taken.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if from == to || self.collections.contains_key(to) {
            return false;
        }
        let Some((index, _, mut collection)) = self.collections.shift_remove_full(from) else {
            return false;
        };
        collection.name = to.to_string();
        self.collections.shift_insert(index, to.to_string(), collection);
        self.commit("rename", to);
        true
    }

    /// Append `item` to a collection. Duplicates and unknown collections are
    /// rejected.
    pub fn add_item(&mut self, collection: &str, item: &str) -> bool {
        let Some(c) = self.collections.get_mut(collection) else {
            return false;
        };
        if c.items.iter().any(|i| i == item) {
            return false;
        }
        c.items.push(item.to_string());
        self.commit("add_item", item);
        true
    }

    pub fn remove_item(&mut self, collection: &str, item: &str) -> bool {
        let Some(c) = self.collections.get_mut(collection) else {
            return false;
        };
        let before = c.items.len();
        c.items.retain(|i| i != item);
        if c.items.len() == before {
            return false;
        }
        self.commit("remove_item", item);
        true
    }

    /// The scopes a collection lists that still exist in `doc`, in
    /// collection order. Dangling names are skipped.
    pub fn resolve_scopes<'a>(
        &self,
        doc: &'a ConfigDocument,
        collection: &str,
    ) -> Vec<(&'a str, &'a Scope)> {
        let Some(c) = self.collections.get(collection) else {
            return Vec::new();
        };
        c.items
            .iter()
            .filter_map(|item| doc.scopes.get_key_value(item.as_str()))
            .map(|(name, scope)| (name.as_str(), scope))
            .collect()
    }

    /// Drop every item naming a scope that no longer exists in `doc`.
    /// Returns how many items were removed.
    pub fn prune(&mut self, doc: &ConfigDocument) -> usize {
        let mut removed = 0;
        for c in self.collections.values_mut() {
            let before = c.items.len();
            c.items.retain(|item| doc.scopes.contains_key(item));
            removed += before - c.items.len();
        }
        if removed > 0 {
            self.commit("prune", &removed.to_string());
        }
        removed
    }

    fn commit(&mut self, op: &str, target: &str) {
        debug!("CollectionStore::{} - {} ({})", op, target, self.key);
        match serde_json::to_string(&self.collections) {
            Ok(text) => {
                if let Err(err) = self.storage.set(&self.key, &text) {
                    warn!("CollectionStore: failed to persist `{}`: {}", self.key, err);
                }
            }
            Err(err) => warn!("CollectionStore: failed to serialize `{}`: {}", self.key, err),
        }
    }
}
