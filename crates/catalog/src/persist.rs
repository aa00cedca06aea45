//! Persistence for the stores.
//!
//! Both files are a JSON array of records:
//! - catalog: `{ id, title, genres, year, rating, director? }`
//! - users:   `{ id, user_name, password, genres, ratings? }`
//!
//! Loading is lenient: a record that fails to parse or validate is
//! skipped with a warning and the rest of the file still loads.

use crate::error::{CatalogError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// =============================================================================
// Wire records
// =============================================================================

/// Maps an entity to and from its on-disk record.
pub trait Record: Sized {
    type Wire: Serialize + DeserializeOwned;

    /// Entity name used in diagnostics
    const KIND: &'static str;

    /// Validate a decoded record into an entity
    fn from_wire(wire: Self::Wire) -> Result<Self>;

    fn to_wire(&self) -> Self::Wire;
}

/// Catalog file record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub title: String,
    pub genres: Vec<String>,
    pub year: i32,
    pub rating: f32,
    #[serde(default = "default_director")]
    pub director: String,
}

fn default_director() -> String {
    DEFAULT_DIRECTOR.to_string()
}

impl Record for Item {
    type Wire = ItemRecord;
    const KIND: &'static str = "item";

    fn from_wire(wire: ItemRecord) -> Result<Self> {
        let genres = Genre::parse_all(&wire.genres)?;
        Ok(Item::new(wire.id, wire.title, genres, wire.year, wire.rating)?
            .with_director(wire.director))
    }

    fn to_wire(&self) -> ItemRecord {
        ItemRecord {
            id: self.id(),
            title: self.title().to_string(),
            genres: self.genres().iter().map(|g| g.as_str().to_string()).collect(),
            year: self.year(),
            rating: self.rating(),
            director: self.director().to_string(),
        }
    }
}

/// User file record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub id: UserId,
    pub user_name: String,
    pub password: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ratings: BTreeMap<ItemId, f32>,
}

impl Record for User {
    type Wire = UserRecord;
    const KIND: &'static str = "user";

    fn from_wire(wire: UserRecord) -> Result<Self> {
        let genres = Genre::parse_all(&wire.genres)?;
        let mut user = User::new(wire.user_name, wire.password)?
            .with_id(wire.id)
            .with_genres(genres);
        for (item_id, score) in wire.ratings {
            user.rate(item_id, score);
        }
        Ok(user)
    }

    fn to_wire(&self) -> UserRecord {
        UserRecord {
            id: self.id(),
            user_name: self.name().to_string(),
            password: self.credential().to_string(),
            genres: self
                .preferred_genres()
                .iter()
                .map(|g| g.as_str().to_string())
                .collect(),
            ratings: self.ratings().clone(),
        }
    }
}

/// Decode a JSON array of records.
///
/// Fails only if the text is not a JSON array. Individual bad records are
/// logged and skipped.
pub fn decode_records<T: Record>(text: &str) -> Result<Vec<T>> {
    let raw: Vec<Value> = serde_json::from_str(text)?;
    let mut records = Vec::with_capacity(raw.len());

    for (index, value) in raw.iter().enumerate() {
        match decode_one::<T>(value) {
            Ok(record) => records.push(record),
            Err(err) => warn!(
                kind = T::KIND,
                index,
                record = %value,
                error = %err,
                "Skipping malformed record"
            ),
        }
    }

    Ok(records)
}

fn decode_one<T: Record>(value: &Value) -> Result<T> {
    let wire = T::Wire::deserialize(value)?;
    T::from_wire(wire)
}

/// Encode records as a pretty-printed JSON array.
pub fn encode_records<T: Record>(records: &[T]) -> Result<String> {
    let wires: Vec<T::Wire> = records.iter().map(T::to_wire).collect();
    Ok(serde_json::to_string_pretty(&wires)?)
}

// =============================================================================
// Backends
// =============================================================================

/// Where a store's snapshot comes from and goes back to.
///
/// `load` runs once when the store opens; `save` runs after every
/// successful mutation with the full snapshot.
pub trait Backend<T> {
    fn load(&mut self) -> Result<Vec<T>>;
    fn save(&mut self, records: &[T]) -> Result<()>;
}

/// A JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Record> Backend<T> for JsonFile {
    /// A missing file, or one that isn't UTF-8 JSON, yields an empty snapshot.
    fn load(&mut self) -> Result<Vec<T>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No {} file found, starting empty", T::KIND);
                return Ok(Vec::new());
            }
            Err(err) => return Err(CatalogError::Io(err)),
        };

        let decoded = std::str::from_utf8(&bytes)
            .map_err(|err| CatalogError::Io(std::io::Error::new(ErrorKind::InvalidData, err)))
            .and_then(decode_records::<T>);

        match decoded {
            Ok(records) => {
                info!(
                    path = %self.path.display(),
                    count = records.len(),
                    "Loaded {} records",
                    T::KIND
                );
                Ok(records)
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Unreadable {} file, starting empty", T::KIND);
                Ok(Vec::new())
            }
        }
    }

    fn save(&mut self, records: &[T]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, encode_records(records)?)?;
        info!(path = %self.path.display(), count = records.len(), "Saved {} records", T::KIND);
        Ok(())
    }
}

/// Keeps the last saved snapshot in memory.
#[derive(Debug, Clone)]
pub struct MemoryBackend<T> {
    records: Vec<T>,
    saves: usize,
}

impl<T> MemoryBackend<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Backend whose first `load` returns `records`
    pub fn with_records(records: Vec<T>) -> Self {
        Self { records, saves: 0 }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// How many times `save` has been called
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl<T> Default for MemoryBackend<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Backend<T> for MemoryBackend<T> {
    fn load(&mut self) -> Result<Vec<T>> {
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[T]) -> Result<()> {
        self.records = records.to_vec();
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_record_round_trip() {
        let text = r#"[{"id":7,"title":"Heat","genres":["crime","thriller"],"year":1995,"rating":8.3,"director":"Michael Mann"}]"#;
        let items: Vec<Item> = decode_records(text).unwrap();
        assert_eq!(items.len(), 1);

        let wire = items[0].to_wire();
        let original: Vec<ItemRecord> = serde_json::from_str(text).unwrap();
        assert_eq!(wire, original[0]);
    }

    #[test]
    fn test_missing_director_defaults() {
        let text = r#"[{"id":1,"title":"Heat","genres":[],"year":1995,"rating":8.0}]"#;
        let items: Vec<Item> = decode_records(text).unwrap();
        assert_eq!(items[0].director(), DEFAULT_DIRECTOR);
    }

    #[test]
    fn test_malformed_records_skipped() {
        let text = r#"[
            {"id":1,"title":"Good","genres":["drama"],"year":2000,"rating":7.0},
            {"id":2,"title":"No rating","genres":["drama"],"year":2000},
            {"id":3,"title":"Bad genre","genres":["space-opera"],"year":2000,"rating":7.0},
            {"id":4,"title":"Too high","genres":[],"year":2000,"rating":11.0},
            {"id":5,"title":"","genres":[],"year":2000,"rating":1.0},
            "not even an object",
            {"id":6,"title":"Also good","genres":[],"year":2001,"rating":5.5}
        ]"#;
        let items: Vec<Item> = decode_records(text).unwrap();
        let ids: Vec<ItemId> = items.iter().map(Item::id).collect();
        assert_eq!(ids, vec![1, 6]);
    }

    #[test]
    fn test_non_array_is_an_error() {
        assert!(decode_records::<Item>(r#"{"id":1}"#).is_err());
        assert!(decode_records::<Item>("not json").is_err());
    }

    #[test]
    fn test_user_record_round_trip() {
        let text = r#"[{"id":3,"user_name":"alex","password":"pw","genres":["action","drama"],"ratings":{"7":9.0}}]"#;
        let users: Vec<User> = decode_records(text).unwrap();
        let user = &users[0];
        assert_eq!(user.id(), 3);
        assert_eq!(user.credential(), "pw");
        assert_eq!(user.rating_for(7), Some(9.0));

        let encoded = encode_records(&users).unwrap();
        let again: Vec<User> = decode_records(&encoded).unwrap();
        assert_eq!(&again[0], user);
    }

    #[test]
    fn test_user_record_defaults() {
        let text = r#"[{"user_name":"alex","password":"pw"}]"#;
        let users: Vec<User> = decode_records(text).unwrap();
        assert_eq!(users[0].id(), 0);
        assert!(users[0].preferred_genres().is_empty());

        let wire = users[0].to_wire();
        let json = serde_json::to_value(&wire).unwrap();
        assert!(json.get("ratings").is_none());
    }

    #[test]
    fn test_memory_backend_counts_saves() {
        let mut backend: MemoryBackend<Item> = MemoryBackend::new();
        assert!(backend.load().unwrap().is_empty());

        let item = Item::new(1, "Heat", vec![Genre::Crime], 1995, 8.3).unwrap();
        backend.save(std::slice::from_ref(&item)).unwrap();
        assert_eq!(backend.save_count(), 1);
        assert_eq!(backend.load().unwrap(), vec![item]);
    }
}
