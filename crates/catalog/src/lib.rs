//! # Catalog Crate
//!
//! Entity model and in-memory stores for the recommender.
//!
//! ## Main Components
//!
//! - **types**: `Genre`, `Item`, `User`
//! - **index**: `CatalogStore`, items indexed by id and by title
//! - **users**: `UserStore`, users indexed by id with id auto-assignment
//! - **persist**: wire records and the `Backend` trait (`JsonFile`, `MemoryBackend`)
//! - **error**: `CatalogError`
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogStore, Genre, UserStore};
//!
//! let catalog = CatalogStore::open_path("data/movies.json")?;
//! let mut users = UserStore::open_path("data/users.json")?;
//!
//! let id = users.register("alex", "secret")?;
//! let horror = catalog.find_by_genre(Genre::Horror);
//! let best = catalog.sort_by_rating(true);
//! ```
//!
//! Stores are explicitly constructed values; nothing here is global, so
//! several independent stores can live side by side.

pub mod error;
pub mod types;
pub mod persist;
pub mod index;
pub mod users;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{
    // Type aliases
    ItemId,
    UserId,
    // Core types
    Genre,
    Item,
    User,
    // Constants
    DEFAULT_DIRECTOR,
    MAX_RATING,
    MIN_RATING,
};
pub use persist::{
    decode_records, encode_records, Backend, ItemRecord, JsonFile, MemoryBackend, Record,
    UserRecord,
};
pub use index::CatalogStore;
pub use users::UserStore;
