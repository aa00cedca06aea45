//! The FilterPipeline chains filters over a ranked list.
//!
//! Filtering always runs after ranking and truncation, so a pipeline can
//! leave fewer than `limit` items even when more matches exist in the
//! full catalog.

use crate::filters::{MinimumRatingFilter, MinimumYearFilter};
use crate::traits::Filter;
use catalog::Item;
use tracing::debug;

/// Chains multiple filters together.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(MinimumRatingFilter::new(7.0))
///     .add_filter(MinimumYearFilter::new(1990));
///
/// let shown = pipeline.apply(ranked);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Pipeline for optional rating / year thresholds; `None` adds no filter.
    pub fn from_thresholds(min_rating: Option<f32>, min_year: Option<i32>) -> Self {
        let mut pipeline = Self::new();
        if let Some(min_rating) = min_rating {
            pipeline = pipeline.add_filter(MinimumRatingFilter::new(min_rating));
        }
        if let Some(min_year) = min_year {
            pipeline = pipeline.add_filter(MinimumYearFilter::new(min_year));
        }
        pipeline
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence, preserving relative order.
    pub fn apply(&self, items: Vec<Item>) -> Vec<Item> {
        let mut current = items;
        for filter in &self.filters {
            let before = current.len();
            current = filter.apply(current);
            debug!(
                "Filter applied: {} ({} -> {} items)",
                filter.name(),
                before,
                current.len()
            );
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep the items with `rating >= min_rating` and `year >= min_year`.
///
/// Absent thresholds impose no constraint. Relative order is preserved.
pub fn apply_filters(ranked: Vec<Item>, min_rating: Option<f32>, min_year: Option<i32>) -> Vec<Item> {
    FilterPipeline::from_thresholds(min_rating, min_year).apply(ranked)
}
