//! Ranking strategies.
//!
//! Three interchangeable policies share one capability
//! (`RecommendationStrategy::recommend`):
//! - `GenrePreferenceStrategy`: items in the acting user's preferred genres
//! - `TopRatedStrategy`: the whole catalog by rating
//! - `SimilarUsersStrategy`: items liked by users with overlapping tastes
//!
//! All of them sort by rating descending with a stable sort, so ties keep
//! catalog order.

pub mod genre_preference;
pub mod similar_users;
pub mod top_rated;

pub use genre_preference::GenrePreferenceStrategy;
pub use similar_users::SimilarUsersStrategy;
pub use top_rated::TopRatedStrategy;

use crate::error::RecommendError;
use crate::traits::RecommendationStrategy;
use catalog::Item;
use std::fmt;
use std::str::FromStr;

/// Identifiers callers use to pick a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Genre,
    TopRated,
    SimilarUsers,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::Genre,
        StrategyKind::TopRated,
        StrategyKind::SimilarUsers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Genre => "genre",
            StrategyKind::TopRated => "top-rated",
            StrategyKind::SimilarUsers => "similar-users",
        }
    }

    /// Menu number for this strategy
    pub fn number(&self) -> u8 {
        match self {
            StrategyKind::Genre => 1,
            StrategyKind::TopRated => 2,
            StrategyKind::SimilarUsers => 3,
        }
    }

    pub fn build(&self) -> Box<dyn RecommendationStrategy> {
        match self {
            StrategyKind::Genre => Box::new(GenrePreferenceStrategy),
            StrategyKind::TopRated => Box::new(TopRatedStrategy),
            StrategyKind::SimilarUsers => Box::new(SimilarUsersStrategy),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = RecommendError;

    /// Accepts the name (`top-rated`) or the menu number (`2`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted || kind.number().to_string() == wanted)
            .ok_or_else(|| RecommendError::UnknownStrategy(s.to_string()))
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable sort by rating (best first), then keep the first `limit`.
pub(crate) fn rank_by_rating(mut items: Vec<&Item>, limit: usize) -> Vec<Item> {
    items.sort_by(|a, b| Item::cmp_rating(b, a));
    items.into_iter().take(limit).cloned().collect()
}
