//! Filter to enforce a minimum item rating.

use crate::traits::Filter;
use catalog::Item;

/// Keeps items with `rating >= min_rating`.
pub struct MinimumRatingFilter {
    min_rating: f32,
}

impl MinimumRatingFilter {
    pub fn new(min_rating: f32) -> Self {
        Self { min_rating }
    }
}

impl Filter for MinimumRatingFilter {
    fn name(&self) -> &str {
        "MinimumRatingFilter"
    }

    fn apply(&self, items: Vec<Item>) -> Vec<Item> {
        items
            .into_iter()
            .filter(|item| item.rating() >= self.min_rating)
            .collect()
    }
}
