//! The user store.
//!
//! Ids are assigned on insert: a user carrying id 0 gets
//! `max existing id + 1` (1 for an empty store). A user whose id is
//! already present replaces the previous entry outright.

use crate::error::{CatalogError, Result};
use crate::persist::{Backend, JsonFile};
use crate::types::*;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// In-memory user list backed by a persistence [`Backend`].
#[derive(Debug)]
pub struct UserStore<B = JsonFile> {
    users: Vec<User>,
    by_id: HashMap<UserId, usize>,
    backend: B,
}

impl UserStore<JsonFile> {
    /// Open a user store saved as a JSON file.
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(JsonFile::new(path))
    }
}

impl<B: Backend<User>> UserStore<B> {
    /// Load the backend's snapshot.
    ///
    /// Loaded users go through the same id rules as [`UserStore::add`];
    /// a user whose name is already taken by another id is skipped.
    pub fn open(mut backend: B) -> Result<Self> {
        let loaded = backend.load()?;
        let mut store = Self {
            users: Vec::with_capacity(loaded.len()),
            by_id: HashMap::with_capacity(loaded.len()),
            backend,
        };

        for user in loaded {
            if let Err(err) = store.insert_in_memory(user) {
                warn!(error = %err, "Skipping user record");
            }
        }

        info!(count = store.users.len(), "Users loaded");
        Ok(store)
    }

    /// Insert a user and return its (possibly newly assigned) id.
    ///
    /// An existing user with the same id is evicted, not merged. Fails with
    /// `DuplicateKey` if a different id already uses the name.
    pub fn add(&mut self, user: User) -> Result<UserId> {
        let id = self.insert_in_memory(user)?;
        self.persist()?;
        Ok(id)
    }

    /// Create and add a fresh user, rejecting a name already in use.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        credential: impl Into<String>,
    ) -> Result<UserId> {
        let user = User::new(name, credential)?;
        if self.find_by_name(user.name()).is_some() {
            return Err(CatalogError::DuplicateKey {
                entity: "User",
                key: user.name().to_string(),
            });
        }
        self.add(user)
    }

    /// Remove a user by id and return it.
    pub fn remove(&mut self, id: UserId) -> Result<User> {
        let position = self.position(id)?;
        let removed = self.users.remove(position);
        self.reindex();
        debug!(id, name = removed.name(), "Removed user");
        self.persist()?;
        Ok(removed)
    }

    /// Overwrite an existing user in place and return the old version.
    pub fn replace(&mut self, user: User) -> Result<User> {
        let position = self.position(user.id())?;
        self.check_name_free(&user)?;
        let old = std::mem::replace(&mut self.users[position], user);
        debug!(id = old.id(), "Replaced user");
        self.persist()?;
        Ok(old)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn persist(&mut self) -> Result<()> {
        self.backend.save(&self.users)
    }
}

impl<B> UserStore<B> {
    /// All users in insertion order
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn lookup_by_id(&self, id: UserId) -> Option<&User> {
        self.by_id.get(&id).map(|&position| &self.users[position])
    }

    /// Exact name match (linear scan).
    pub fn find_by_name(&self, name: &str) -> Option<&User> {
        self.users.iter().find(|user| user.name() == name)
    }

    /// The id `add` would assign to a user carrying id 0.
    ///
    /// Fails with `IdSpaceExhausted` once `u32::MAX` is in use.
    pub fn next_id(&self) -> Result<UserId> {
        match self.by_id.keys().max() {
            None => Ok(1),
            Some(&max) => max.checked_add(1).ok_or(CatalogError::IdSpaceExhausted {
                entity: "User",
                last: max,
            }),
        }
    }

    fn position(&self, id: UserId) -> Result<usize> {
        self.by_id
            .get(&id)
            .copied()
            .ok_or(CatalogError::NotFound { entity: "User", id })
    }

    fn check_name_free(&self, user: &User) -> Result<()> {
        match self.find_by_name(user.name()) {
            Some(other) if other.id() != user.id() => Err(CatalogError::DuplicateKey {
                entity: "User",
                key: user.name().to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn insert_in_memory(&mut self, mut user: User) -> Result<UserId> {
        if user.id() == 0 {
            user.assign_id(self.next_id()?);
        }
        self.check_name_free(&user)?;

        let id = user.id();
        if let Some(position) = self.by_id.get(&id).copied() {
            warn!(id, "User id already present, replacing previous entry");
            self.users.remove(position);
            self.reindex();
        }

        self.by_id.insert(id, self.users.len());
        self.users.push(user);
        Ok(id)
    }

    fn reindex(&mut self) {
        self.by_id.clear();
        for (position, user) in self.users.iter().enumerate() {
            self.by_id.insert(user.id(), position);
        }
    }
}
