//! Filter to drop items released before a given year.

use crate::traits::Filter;
use catalog::Item;

/// Keeps items with `year >= min_year`.
pub struct MinimumYearFilter {
    min_year: i32,
}

impl MinimumYearFilter {
    pub fn new(min_year: i32) -> Self {
        Self { min_year }
    }
}

impl Filter for MinimumYearFilter {
    fn name(&self) -> &str {
        "MinimumYearFilter"
    }

    fn apply(&self, items: Vec<Item>) -> Vec<Item> {
        items
            .into_iter()
            .filter(|item| item.year() >= self.min_year)
            .collect()
    }
}
