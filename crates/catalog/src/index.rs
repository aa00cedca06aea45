//! The catalog store.
//!
//! Owns the authoritative list of items plus two lookup indices:
//! - `by_id`: item id -> position in `items`
//! - `by_title`: lowercased, trimmed title -> position in `items`
//!
//! Both indices are rebuilt whenever a removal shifts positions, so an
//! item is never reachable through an index after it leaves the list.

use crate::error::{CatalogError, Result};
use crate::persist::{Backend, JsonFile};
use crate::types::*;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// In-memory catalog backed by a persistence [`Backend`].
#[derive(Debug)]
pub struct CatalogStore<B = JsonFile> {
    items: Vec<Item>,
    by_id: HashMap<ItemId, usize>,
    by_title: HashMap<String, usize>,
    backend: B,
}

impl CatalogStore<JsonFile> {
    /// Open a catalog stored as a JSON file.
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(JsonFile::new(path))
    }
}

impl<B: Backend<Item>> CatalogStore<B> {
    /// Load the backend's snapshot and build the indices.
    ///
    /// Items repeating an id already loaded are skipped.
    pub fn open(mut backend: B) -> Result<Self> {
        let loaded = backend.load()?;
        let mut store = Self {
            items: Vec::with_capacity(loaded.len()),
            by_id: HashMap::with_capacity(loaded.len()),
            by_title: HashMap::with_capacity(loaded.len()),
            backend,
        };

        for item in loaded {
            if store.by_id.contains_key(&item.id()) {
                warn!(id = item.id(), title = item.title(), "Skipping item with duplicate id");
                continue;
            }
            store.insert_in_memory(item);
        }

        info!(count = store.items.len(), "Catalog loaded");
        Ok(store)
    }

    // -------------------------------------------------------------------------
    // Mutations: each one persists the full catalog on success
    // -------------------------------------------------------------------------

    /// Append a new item. Fails with `DuplicateKey` if the id is taken.
    pub fn add(&mut self, item: Item) -> Result<()> {
        if self.by_id.contains_key(&item.id()) {
            return Err(CatalogError::DuplicateKey {
                entity: "Item",
                key: item.id().to_string(),
            });
        }
        debug!(id = item.id(), title = item.title(), "Adding item");
        self.insert_in_memory(item);
        self.persist()
    }

    /// Remove an item by id and return it.
    pub fn remove(&mut self, id: ItemId) -> Result<Item> {
        let position = self.position(id)?;
        let removed = self.items.remove(position);
        self.reindex();
        debug!(id, title = removed.title(), "Removed item");
        self.persist()?;
        Ok(removed)
    }

    /// Swap in a new version of an existing item and return the old one.
    ///
    /// The new version goes to the end of the catalog order.
    pub fn replace(&mut self, item: Item) -> Result<Item> {
        let position = self.position(item.id())?;
        let old = self.items.remove(position);
        self.reindex();
        self.insert_in_memory(item);
        debug!(id = old.id(), "Replaced item");
        self.persist()?;
        Ok(old)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn persist(&mut self) -> Result<()> {
        self.backend.save(&self.items)
    }
}

impl<B> CatalogStore<B> {
    // -------------------------------------------------------------------------
    // Lookups: never mutate
    // -------------------------------------------------------------------------

    /// The catalog in insertion order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn lookup_by_id(&self, id: ItemId) -> Option<&Item> {
        self.by_id.get(&id).map(|&position| &self.items[position])
    }

    /// Case-insensitive exact title match.
    ///
    /// When two items share a title, the one added last wins.
    pub fn lookup_by_title(&self, title: &str) -> Option<&Item> {
        self.by_title
            .get(&normalize_title(title))
            .map(|&position| &self.items[position])
    }

    /// Items tagged with `genre`, in catalog order.
    pub fn find_by_genre(&self, genre: Genre) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| item.genres().contains(&genre))
            .collect()
    }

    /// Stable sort by rating; ties keep catalog order.
    pub fn sort_by_rating(&self, descending: bool) -> Vec<&Item> {
        let mut sorted: Vec<&Item> = self.items.iter().collect();
        if descending {
            sorted.sort_by(|a, b| Item::cmp_rating(b, a));
        } else {
            sorted.sort_by(|a, b| Item::cmp_rating(a, b));
        }
        sorted
    }

    /// Stable sort by year; ties keep catalog order.
    pub fn sort_by_year(&self, descending: bool) -> Vec<&Item> {
        let mut sorted: Vec<&Item> = self.items.iter().collect();
        if descending {
            sorted.sort_by_key(|item| std::cmp::Reverse(item.year()));
        } else {
            sorted.sort_by_key(|item| item.year());
        }
        sorted
    }

    /// Distinct genres present in the catalog, sorted
    pub fn genres_in_use(&self) -> BTreeSet<Genre> {
        self.items
            .iter()
            .flat_map(|item| item.genres().iter().copied())
            .collect()
    }

    fn position(&self, id: ItemId) -> Result<usize> {
        self.by_id
            .get(&id)
            .copied()
            .ok_or(CatalogError::NotFound { entity: "Item", id })
    }

    fn insert_in_memory(&mut self, item: Item) {
        let position = self.items.len();
        self.by_id.insert(item.id(), position);
        self.by_title.insert(normalize_title(item.title()), position);
        self.items.push(item);
    }

    fn reindex(&mut self) {
        self.by_id.clear();
        self.by_title.clear();
        for (position, item) in self.items.iter().enumerate() {
            self.by_id.insert(item.id(), position);
            self.by_title.insert(normalize_title(item.title()), position);
        }
    }
}

fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
