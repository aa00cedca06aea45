//! Recommend items in the acting user's preferred genres.
//!
//! An item qualifies if it carries at least one preferred genre (OR, not
//! AND). Qualifying items are ranked by rating, best first.

use crate::error::{RecommendError, Result};
use crate::strategies::rank_by_rating;
use crate::traits::{RecommendContext, RecommendationStrategy};
use catalog::Item;
use tracing::{debug, instrument};

/// Genre-preference strategy. Requires an acting user.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenrePreferenceStrategy;

impl RecommendationStrategy for GenrePreferenceStrategy {
    fn name(&self) -> &str {
        "genre"
    }

    #[instrument(skip_all, fields(limit = context.limit))]
    fn recommend(&self, catalog: &[Item], context: &RecommendContext<'_>) -> Result<Vec<Item>> {
        let user = context.user.ok_or(RecommendError::MissingContext {
            strategy: "genre",
            missing: "an acting user",
        })?;

        let preferred = user.preferred_genres();
        let matched: Vec<&Item> = catalog
            .iter()
            .filter(|item| item.has_any_genre(preferred))
            .collect();
        debug!(
            user_id = user.id(),
            preferred = preferred.len(),
            matched = matched.len(),
            "Matched items on preferred genres"
        );

        Ok(rank_by_rating(matched, context.limit))
    }
}
