//! Recommend items liked by users with overlapping genre tastes.
//!
//! ## Algorithm
//! 1. Similar users: every other user (by id) sharing at least one
//!    preferred genre with the acting user
//! 2. Candidate pool: for each similar user, every catalog item carrying
//!    one of that user's preferred genres. An item matched by several
//!    similar users enters the pool once per user.
//! 3. Stable sort of the pool by rating, best first
//! 4. Deduplicate by item id, keeping the first (highest placed) copy
//! 5. Truncate to the limit

use crate::error::{RecommendError, Result};
use crate::traits::{RecommendContext, RecommendationStrategy};
use catalog::{Item, ItemId, User};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Similar-users strategy. Requires an acting user and the user list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarUsersStrategy;

impl SimilarUsersStrategy {
    /// Users other than `user` who share a preferred genre with it.
    fn find_similar_users<'a>(user: &User, users: &'a [User]) -> Vec<&'a User> {
        users
            .iter()
            .filter(|other| other.id() != user.id() && other.shares_genre_with(user))
            .collect()
    }

    fn candidate_pool<'a>(catalog: &'a [Item], similar: &[&User]) -> Vec<&'a Item> {
        similar
            .iter()
            .flat_map(|other| {
                catalog
                    .iter()
                    .filter(move |item| item.has_any_genre(other.preferred_genres()))
            })
            .collect()
    }
}

impl RecommendationStrategy for SimilarUsersStrategy {
    fn name(&self) -> &str {
        "similar-users"
    }

    #[instrument(skip_all, fields(limit = context.limit))]
    fn recommend(&self, catalog: &[Item], context: &RecommendContext<'_>) -> Result<Vec<Item>> {
        let user = context.user.ok_or(RecommendError::MissingContext {
            strategy: "similar-users",
            missing: "an acting user",
        })?;
        let users = context.users.ok_or(RecommendError::MissingContext {
            strategy: "similar-users",
            missing: "the user list",
        })?;

        let similar = Self::find_similar_users(user, users);
        debug!(user_id = user.id(), similar = similar.len(), "Found similar users");

        let mut pool = Self::candidate_pool(catalog, &similar);
        let pooled = pool.len();
        pool.sort_by(|a, b| Item::cmp_rating(b, a));

        let mut seen: HashSet<ItemId> = HashSet::with_capacity(pool.len());
        pool.retain(|item| seen.insert(item.id()));
        debug!(pooled, unique = pool.len(), "Deduplicated candidate pool");

        Ok(pool.into_iter().take(context.limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::Genre;

    fn create_test_catalog() -> Vec<Item> {
        vec![
            Item::new(1, "Horror Movie", vec![Genre::Horror], 1980, 8.0).unwrap(),
            Item::new(2, "Comedy Movie", vec![Genre::Comedy], 1990, 9.0).unwrap(),
            Item::new(3, "War Movie", vec![Genre::War], 2000, 9.5).unwrap(),
            Item::new(4, "Horror Comedy", vec![Genre::Horror, Genre::Comedy], 2005, 7.0).unwrap(),
            Item::new(5, "Drama", vec![Genre::Drama], 2010, 6.0).unwrap(),
        ]
    }

    fn create_test_users() -> Vec<User> {
        vec![
            User::new("me", "pw").unwrap().with_id(1).with_genres([Genre::Horror]),
            User::new("twin", "pw").unwrap().with_id(2).with_genres([Genre::Horror, Genre::Comedy]),
            User::new("fan", "pw").unwrap().with_id(3).with_genres([Genre::Horror, Genre::Drama]),
            User::new("other", "pw").unwrap().with_id(4).with_genres([Genre::War]),
        ]
    }

    #[test]
    fn test_pool_from_similar_users_only() {
        let catalog = create_test_catalog();
        let users = create_test_users();
        let ctx = RecommendContext::for_user(&users[0])
            .with_users(&users)
            .with_limit(10);

        let result = SimilarUsersStrategy.recommend(&catalog, &ctx).unwrap();
        let ids: Vec<u32> = result.iter().map(Item::id).collect();

        // War (user 4 only) never appears; everything else exactly once
        assert_eq!(ids, vec![2, 1, 4, 5]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let catalog = create_test_catalog();
        let users = create_test_users();
        let ctx = RecommendContext::for_user(&users[0]).with_users(&users);

        let result = SimilarUsersStrategy.recommend(&catalog, &ctx).unwrap();
        let horror_count = result.iter().filter(|item| item.id() == 1).count();
        assert_eq!(horror_count, 1);
        assert_eq!(result[1].id(), 1);
    }

    #[test]
    fn test_identical_profiles_are_similar() {
        let catalog = create_test_catalog();
        let users = vec![
            User::new("a", "pw").unwrap().with_id(1).with_genres([Genre::War]),
            User::new("b", "pw").unwrap().with_id(2).with_genres([Genre::War]),
        ];
        let ctx = RecommendContext::for_user(&users[0]).with_users(&users);

        let result = SimilarUsersStrategy.recommend(&catalog, &ctx).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id(), 3);
    }

    #[test]
    fn test_self_excluded() {
        let catalog = create_test_catalog();
        let users = create_test_users();
        let alone = &users[3..];
        let ctx = RecommendContext::for_user(&users[3]).with_users(alone);

        assert!(SimilarUsersStrategy.recommend(&catalog, &ctx).unwrap().is_empty());
    }

    #[test]
    fn test_limit() {
        let catalog = create_test_catalog();
        let users = create_test_users();
        let ctx = RecommendContext::for_user(&users[0]).with_users(&users).with_limit(2);

        let ids: Vec<u32> = SimilarUsersStrategy
            .recommend(&catalog, &ctx)
            .unwrap()
            .iter()
            .map(Item::id)
            .collect();
        assert_eq!(ids, vec![2, 1]);

        let ctx = ctx.with_limit(0);
        assert!(SimilarUsersStrategy.recommend(&catalog, &ctx).unwrap().is_empty());
    }

    #[test]
    fn test_requires_user_and_users() {
        let catalog = create_test_catalog();
        let users = create_test_users();

        let err = SimilarUsersStrategy
            .recommend(&catalog, &RecommendContext::anonymous().with_users(&users))
            .unwrap_err();
        assert!(matches!(err, RecommendError::MissingContext { missing: "an acting user", .. }));

        let err = SimilarUsersStrategy
            .recommend(&catalog, &RecommendContext::for_user(&users[0]))
            .unwrap_err();
        assert!(matches!(err, RecommendError::MissingContext { missing: "the user list", .. }));
    }
}
