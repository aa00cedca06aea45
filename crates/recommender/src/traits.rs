//! Core traits for ranking and filtering.
//!
//! - `RecommendationStrategy`: turns a catalog snapshot into a ranked list
//! - `Filter`: narrows an already-ranked list
//!
//! Neither may mutate its inputs; both hand back new vectors.

use crate::error::Result;
use catalog::{Item, User};

/// Number of recommendations returned when the caller doesn't say
pub const DEFAULT_LIMIT: usize = 5;

/// Who is asking, and how many results they want.
///
/// ## Usage
/// ```ignore
/// let ctx = RecommendContext::for_user(&alex)
///     .with_users(users.users())
///     .with_limit(10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RecommendContext<'a> {
    /// The acting user, if any
    pub user: Option<&'a User>,
    /// Every known user, for strategies that compare profiles
    pub users: Option<&'a [User]>,
    /// Maximum results; 0 yields an empty list
    pub limit: usize,
}

impl<'a> RecommendContext<'a> {
    /// No user context, default limit.
    pub fn anonymous() -> Self {
        Self {
            user: None,
            users: None,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn for_user(user: &'a User) -> Self {
        Self {
            user: Some(user),
            ..Self::anonymous()
        }
    }

    pub fn with_users(mut self, users: &'a [User]) -> Self {
        self.users = Some(users);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl Default for RecommendContext<'_> {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// One ranking policy.
///
/// `Send + Sync` so an engine can be shared behind a lock if a caller
/// needs to; the strategies themselves hold no state.
pub trait RecommendationStrategy: Send + Sync {
    /// Stable identifier (for logging and selection)
    fn name(&self) -> &str;

    /// Rank `catalog` for the given context.
    ///
    /// # Returns
    /// * `Ok(Vec<Item>)` - at most `context.limit` items, best first
    /// * `Err(MissingContext)` - the strategy needs a user or user list it didn't get
    fn recommend(&self, catalog: &[Item], context: &RecommendContext<'_>) -> Result<Vec<Item>>;
}

/// Narrows a ranked list, keeping relative order.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Keep the items that pass; takes ownership to avoid cloning.
    fn apply(&self, items: Vec<Item>) -> Vec<Item>;
}
