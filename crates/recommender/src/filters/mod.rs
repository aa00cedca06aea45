//! Filter implementations for the post-ranking stage.
//!
//! These narrow an already-ranked list and can be composed into a
//! FilterPipeline.

pub mod minimum_rating;
pub mod minimum_year;

// Re-export for convenience
pub use minimum_rating::MinimumRatingFilter;
pub use minimum_year::MinimumYearFilter;
