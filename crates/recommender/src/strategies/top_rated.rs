//! Recommend the best-rated items in the catalog, no personalisation.

use crate::error::Result;
use crate::strategies::rank_by_rating;
use crate::traits::{RecommendContext, RecommendationStrategy};
use catalog::Item;
use tracing::instrument;

/// Top-rated strategy. Ignores the user context entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopRatedStrategy;

impl RecommendationStrategy for TopRatedStrategy {
    fn name(&self) -> &str {
        "top-rated"
    }

    #[instrument(skip_all, fields(limit = context.limit, catalog = catalog.len()))]
    fn recommend(&self, catalog: &[Item], context: &RecommendContext<'_>) -> Result<Vec<Item>> {
        Ok(rank_by_rating(catalog.iter().collect(), context.limit))
    }
}
