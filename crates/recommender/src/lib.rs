//! Ranking strategies, the recommendation engine and the filter stage.
//!
//! This crate provides:
//! - RecommendationStrategy trait and three strategies (genre, top-rated,
//!   similar-users), selectable by `StrategyKind`
//! - RecommendationEngine, which delegates to a hot-swappable strategy
//! - Filter trait, minimum-rating / minimum-year filters and FilterPipeline
//!
//! ## Architecture
//! A request runs in two stages:
//! 1. The active strategy ranks the catalog snapshot and truncates to the limit
//! 2. The filter stage narrows that ranked list by the optional thresholds
//!
//! Nothing here mutates a store; strategies read a `&[Item]` snapshot.
//!
//! ## Example Usage
//! ```ignore
//! use recommender::{RecommendContext, RecommendationEngine, StrategyKind, apply_filters};
//!
//! let mut engine = RecommendationEngine::with_kind(StrategyKind::Genre);
//! let ctx = RecommendContext::for_user(&alex).with_users(users.users());
//!
//! let ranked = engine.recommend(catalog.items(), &ctx)?;
//! let shown = apply_filters(ranked, Some(7.0), Some(1990));
//!
//! engine.set_strategy(StrategyKind::SimilarUsers.build());
//! ```

pub mod error;
pub mod traits;
pub mod strategies;
pub mod engine;
pub mod filters;
pub mod filter_pipeline;

// Re-export main types
pub use error::{RecommendError, Result};
pub use traits::{Filter, RecommendContext, RecommendationStrategy, DEFAULT_LIMIT};
pub use strategies::{
    GenrePreferenceStrategy, SimilarUsersStrategy, StrategyKind, TopRatedStrategy,
};
pub use engine::RecommendationEngine;
pub use filter_pipeline::{apply_filters, FilterPipeline};
