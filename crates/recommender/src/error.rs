//! Error types for the recommender crate.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// Strategy was called without the user context it needs
    #[error("{strategy} strategy requires {missing}")]
    MissingContext {
        strategy: &'static str,
        missing: &'static str,
    },

    /// Strategy identifier not recognised
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),
}

pub type Result<T> = std::result::Result<T, RecommendError>;
