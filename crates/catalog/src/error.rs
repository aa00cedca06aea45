//! Error types for the catalog crate.
//!
//! Three families live here:
//! - validation failures raised when an entity is built or mutated
//! - key conflicts raised by store mutations
//! - I/O and JSON failures from the persistence backend

use thiserror::Error;

/// Errors raised by entities, stores and backends.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Rating outside the closed range [0, 10]
    #[error("Rating must be between 0 and 10, got {value}")]
    InvalidRating { value: f32 },

    /// Genre tag not in the fixed vocabulary
    #[error("Unknown genre: {0}")]
    UnknownGenre(String),

    /// Required text field was empty
    #[error("Field {field} must not be empty")]
    EmptyField { field: &'static str },

    /// Insert collided with an existing key
    #[error("{entity} with key {key} already exists")]
    DuplicateKey { entity: &'static str, key: String },

    /// Referenced entity doesn't exist
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: u32 },

    /// Every positive id below `u32::MAX` is already taken
    #[error("No {entity} id left to assign after {last}")]
    IdSpaceExhausted { entity: &'static str, last: u32 },

    /// I/O error while reading or writing the backing file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON, or a record that doesn't match its wire shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    /// True for the errors raised while validating entity fields.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CatalogError::InvalidRating { .. }
                | CatalogError::UnknownGenre(_)
                | CatalogError::EmptyField { .. }
        )
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
