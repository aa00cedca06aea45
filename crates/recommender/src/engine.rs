//! The recommendation engine.
//!
//! Holds exactly one active strategy and forwards every request to it.
//! Swapping the strategy changes nothing else; callers keep calling
//! `recommend` the same way.

use crate::error::Result;
use crate::filter_pipeline::apply_filters;
use crate::strategies::StrategyKind;
use crate::traits::{RecommendContext, RecommendationStrategy};
use catalog::Item;
use tracing::{debug, info};

/// Delegates to the currently selected strategy.
///
/// Not safe for concurrent mutation: `set_strategy` takes `&mut self`, so
/// a shared engine needs external locking.
pub struct RecommendationEngine {
    strategy: Box<dyn RecommendationStrategy>,
}

impl RecommendationEngine {
    pub fn new(strategy: Box<dyn RecommendationStrategy>) -> Self {
        Self { strategy }
    }

    /// Engine starting with the strategy `kind` names
    pub fn with_kind(kind: StrategyKind) -> Self {
        Self::new(kind.build())
    }

    /// Replace the active strategy.
    pub fn set_strategy(&mut self, strategy: Box<dyn RecommendationStrategy>) {
        info!(from = self.strategy.name(), to = strategy.name(), "Switching strategy");
        self.strategy = strategy;
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Run the active strategy; its result comes back untouched.
    pub fn recommend(&self, catalog: &[Item], context: &RecommendContext<'_>) -> Result<Vec<Item>> {
        let ranked = self.strategy.recommend(catalog, context)?;
        debug!(strategy = self.strategy.name(), count = ranked.len(), "Ranked items");
        Ok(ranked)
    }

    /// Rank, truncate to `context.limit`, then apply the thresholds.
    pub fn recommend_filtered(
        &self,
        catalog: &[Item],
        context: &RecommendContext<'_>,
        min_rating: Option<f32>,
        min_year: Option<i32>,
    ) -> Result<Vec<Item>> {
        let ranked = self.recommend(catalog, context)?;
        Ok(apply_filters(ranked, min_rating, min_year))
    }
}

impl From<StrategyKind> for RecommendationEngine {
    fn from(kind: StrategyKind) -> Self {
        Self::with_kind(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecommendError;
    use crate::strategies::{GenrePreferenceStrategy, TopRatedStrategy};
    use catalog::{Genre, User};

    fn create_test_catalog() -> Vec<Item> {
        vec![
            Item::new(1, "Horror Movie", vec![Genre::Horror], 1980, 8.0).unwrap(),
            Item::new(2, "Comedy Movie", vec![Genre::Comedy], 1990, 9.0).unwrap(),
        ]
    }

    #[test]
    fn test_delegates_to_active_strategy() {
        let catalog = create_test_catalog();
        let user = User::new("fan", "pw").unwrap().with_genres([Genre::Horror]);
        let ctx = RecommendContext::for_user(&user);

        let mut engine = RecommendationEngine::new(Box::new(TopRatedStrategy));
        assert_eq!(engine.strategy_name(), "top-rated");
        let direct = TopRatedStrategy.recommend(&catalog, &ctx).unwrap();
        assert_eq!(engine.recommend(&catalog, &ctx).unwrap(), direct);

        engine.set_strategy(Box::new(GenrePreferenceStrategy));
        assert_eq!(engine.strategy_name(), "genre");
        let result = engine.recommend(&catalog, &ctx).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id(), 1);
    }

    #[test]
    fn test_errors_pass_through() {
        let engine = RecommendationEngine::from(StrategyKind::SimilarUsers);
        let err = engine
            .recommend(&create_test_catalog(), &RecommendContext::anonymous())
            .unwrap_err();
        assert!(matches!(err, RecommendError::MissingContext { .. }));
    }

    #[test]
    fn test_filter_runs_after_limit() {
        let catalog = vec![
            Item::new(1, "Best Old", vec![Genre::Drama], 1950, 9.5).unwrap(),
            Item::new(2, "Good New", vec![Genre::Drama], 2020, 8.0).unwrap(),
        ];
        let engine = RecommendationEngine::with_kind(StrategyKind::TopRated);
        let ctx = RecommendContext::anonymous().with_limit(1);

        let result = engine.recommend_filtered(&catalog, &ctx, None, Some(2000)).unwrap();
        assert!(result.is_empty());
    }
}
