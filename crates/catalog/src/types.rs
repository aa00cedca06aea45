//! Core domain types for the catalog.
//!
//! - `Genre`: the fixed tag vocabulary every item and preference is drawn from
//! - `Item`: a rated, genre-tagged catalog entry (a film)
//! - `User`: a profile with declared genre preferences and explicit ratings
//!
//! Fields are private so every mutation goes through a validating setter.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a catalog item
pub type ItemId = u32;

/// Unique identifier for a user. `0` means "not yet assigned".
pub type UserId = u32;

/// Director recorded when none is given
pub const DEFAULT_DIRECTOR: &str = "unspecified";

/// Lowest and highest accepted item rating
pub const MIN_RATING: f32 = 0.0;
pub const MAX_RATING: f32 = 10.0;

// =============================================================================
// Genre
// =============================================================================

/// The fixed genre vocabulary.
///
/// Wire names are kebab-case (`sci-fi`, `film-noir`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Genre {
    Action,
    Adventure,
    Animation,
    Children,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Fantasy,
    FilmNoir,
    Horror,
    Musical,
    Mystery,
    Romance,
    SciFi,
    Thriller,
    War,
    Western,
}

impl Genre {
    /// Every genre, in declaration order
    pub const ALL: [Genre; 18] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Animation,
        Genre::Children,
        Genre::Comedy,
        Genre::Crime,
        Genre::Documentary,
        Genre::Drama,
        Genre::Fantasy,
        Genre::FilmNoir,
        Genre::Horror,
        Genre::Musical,
        Genre::Mystery,
        Genre::Romance,
        Genre::SciFi,
        Genre::Thriller,
        Genre::War,
        Genre::Western,
    ];

    /// Wire name of this genre
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Action => "action",
            Genre::Adventure => "adventure",
            Genre::Animation => "animation",
            Genre::Children => "children",
            Genre::Comedy => "comedy",
            Genre::Crime => "crime",
            Genre::Documentary => "documentary",
            Genre::Drama => "drama",
            Genre::Fantasy => "fantasy",
            Genre::FilmNoir => "film-noir",
            Genre::Horror => "horror",
            Genre::Musical => "musical",
            Genre::Mystery => "mystery",
            Genre::Romance => "romance",
            Genre::SciFi => "sci-fi",
            Genre::Thriller => "thriller",
            Genre::War => "war",
            Genre::Western => "western",
        }
    }

    /// Parse a list of tags, failing on the first one outside the vocabulary.
    pub fn parse_all<I, S>(tags: I) -> Result<Vec<Genre>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter().map(|tag| tag.as_ref().parse()).collect()
    }
}

impl FromStr for Genre {
    type Err = CatalogError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Genre::ALL
            .into_iter()
            .find(|genre| genre.as_str() == wanted)
            .ok_or_else(|| CatalogError::UnknownGenre(s.to_string()))
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Item
// =============================================================================

/// A catalog entry.
///
/// `PartialEq` compares every field. Ranking code orders items by rating
/// alone, and does so only through [`Item::cmp_rating`].
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: ItemId,
    title: String,
    genres: Vec<Genre>,
    year: i32,
    rating: f32,
    director: String,
}

impl Item {
    /// Build a validated item with the default director.
    pub fn new(
        id: ItemId,
        title: impl Into<String>,
        genres: Vec<Genre>,
        year: i32,
        rating: f32,
    ) -> Result<Self> {
        Ok(Self {
            id,
            title: validate_text("title", title.into())?,
            genres,
            year,
            rating: validate_rating(rating)?,
            director: DEFAULT_DIRECTOR.to_string(),
        })
    }

    /// Set the director; a blank name falls back to the default.
    pub fn with_director(mut self, director: impl Into<String>) -> Self {
        self.set_director(director);
        self
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Rating, already rounded to one decimal place
    pub fn rating(&self) -> f32 {
        self.rating
    }

    pub fn director(&self) -> &str {
        &self.director
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.title = validate_text("title", title.into())?;
        Ok(())
    }

    pub fn set_year(&mut self, year: i32) {
        self.year = year;
    }

    /// Store `value` rounded to one decimal, halves away from zero (8.25 -> 8.3).
    /// Fails outside [0, 10] and leaves the old value.
    pub fn set_rating(&mut self, value: f32) -> Result<()> {
        self.rating = validate_rating(value)?;
        Ok(())
    }

    pub fn set_genres(&mut self, genres: Vec<Genre>) {
        self.genres = genres;
    }

    /// Replace genres from text tags. All-or-nothing.
    pub fn set_genre_tags<I, S>(&mut self, tags: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.genres = Genre::parse_all(tags)?;
        Ok(())
    }

    pub fn set_director(&mut self, director: impl Into<String>) {
        let director = director.into();
        self.director = if director.trim().is_empty() {
            DEFAULT_DIRECTOR.to_string()
        } else {
            director
        };
    }

    /// True if this item carries at least one of `genres`.
    pub fn has_any_genre<'a>(&self, genres: impl IntoIterator<Item = &'a Genre>) -> bool {
        genres.into_iter().any(|genre| self.genres.contains(genre))
    }

    /// Orders two items by rating only.
    ///
    /// Items with equal ratings compare `Equal` whatever their other fields.
    /// Use this as the sort key for rankings; use `==` for identity.
    pub fn cmp_rating(a: &Item, b: &Item) -> Ordering {
        a.rating.total_cmp(&b.rating)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let genres = self
            .genres
            .iter()
            .map(Genre::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "«{}» ({} | dir. {} | [{}] | rating: {}/10)",
            self.title, self.year, self.director, genres, self.rating
        )
    }
}

fn validate_rating(value: f32) -> Result<f32> {
    if (MIN_RATING..=MAX_RATING).contains(&value) {
        Ok((value * 10.0).round() / 10.0)
    } else {
        Err(CatalogError::InvalidRating { value })
    }
}

fn validate_text(field: &'static str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        Err(CatalogError::EmptyField { field })
    } else {
        Ok(value)
    }
}

// =============================================================================
// User
// =============================================================================

/// A user profile.
///
/// The credential is kept verbatim, exactly as it was supplied.
#[derive(Clone, PartialEq)]
pub struct User {
    id: UserId,
    name: String,
    credential: String,
    preferred_genres: BTreeSet<Genre>,
    ratings: BTreeMap<ItemId, f32>,
}

impl User {
    /// New user with id 0 (assigned by the store on insert).
    pub fn new(name: impl Into<String>, credential: impl Into<String>) -> Result<Self> {
        Ok(Self {
            id: 0,
            name: validate_text("name", name.into())?,
            credential: credential.into(),
            preferred_genres: BTreeSet::new(),
            ratings: BTreeMap::new(),
        })
    }

    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = id;
        self
    }

    pub fn with_genres(mut self, genres: impl IntoIterator<Item = Genre>) -> Self {
        self.preferred_genres.extend(genres);
        self
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: UserId) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn preferred_genres(&self) -> &BTreeSet<Genre> {
        &self.preferred_genres
    }

    /// Add preferred genres from text tags.
    ///
    /// Tags outside the vocabulary are skipped one by one. Returns how many
    /// tags were accepted (a tag already in the set still counts).
    pub fn add_genres<I, S>(&mut self, tags: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut accepted = 0;
        for tag in tags {
            if let Ok(genre) = tag.as_ref().parse::<Genre>() {
                self.preferred_genres.insert(genre);
                accepted += 1;
            }
        }
        accepted
    }

    /// Replace the preference set.
    pub fn set_preferences(&mut self, genres: impl IntoIterator<Item = Genre>) {
        self.preferred_genres = genres.into_iter().collect();
    }

    /// True if the two users share at least one preferred genre.
    pub fn shares_genre_with(&self, other: &User) -> bool {
        !self.preferred_genres.is_disjoint(&other.preferred_genres)
    }

    /// Record a score for an item, overwriting any earlier one.
    pub fn rate(&mut self, item_id: ItemId, score: f32) {
        self.ratings.insert(item_id, score);
    }

    pub fn rating_for(&self, item_id: ItemId) -> Option<f32> {
        self.ratings.get(&item_id).copied()
    }

    pub fn ratings(&self) -> &BTreeMap<ItemId, f32> {
        &self.ratings
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("credential", &"<redacted>")
            .field("preferred_genres", &self.preferred_genres)
            .field("ratings", &self.ratings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(rating: f32) -> Result<Item> {
        Item::new(1, "Alien", vec![Genre::Horror, Genre::SciFi], 1979, rating)
    }

    #[test]
    fn test_rating_rounds_to_one_decimal() {
        for (input, expected) in [(0.0, 0.0), (7.44, 7.4), (7.46, 7.5), (9.99, 10.0), (10.0, 10.0)] {
            assert_eq!(item(input).unwrap().rating(), expected, "input {}", input);
        }
    }

    #[test]
    fn test_rating_halves_round_away_from_zero() {
        assert_eq!(item(8.25).unwrap().rating(), 8.3);
        assert_eq!(item(0.25).unwrap().rating(), 0.3);

        let mut movie = item(5.0).unwrap();
        movie.set_rating(6.75).unwrap();
        assert_eq!(movie.rating(), 6.8);
    }

    #[test]
    fn test_plain_setters() {
        let mut movie = item(8.5).unwrap();
        movie.set_year(1986);
        movie.set_genres(vec![Genre::Action]);

        assert_eq!(movie.year(), 1986);
        assert_eq!(movie.genres(), &[Genre::Action]);
        assert!(!movie.has_any_genre(&[Genre::Horror]));
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        for bad in [-0.1, 10.01, 42.0, f32::NAN] {
            let err = item(bad).unwrap_err();
            assert!(err.is_validation());
        }

        let mut movie = item(8.0).unwrap();
        assert!(movie.set_rating(11.0).is_err());
        assert_eq!(movie.rating(), 8.0);
        movie.set_rating(6.25).unwrap();
        assert_eq!(movie.rating(), 6.3);
    }

    #[test]
    fn test_empty_title_rejected() {
        let err = Item::new(1, "   ", vec![], 2000, 5.0).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyField { field: "title" }));
    }

    #[test]
    fn test_director_defaults() {
        let movie = item(8.0).unwrap();
        assert_eq!(movie.director(), DEFAULT_DIRECTOR);
        let movie = movie.with_director("Ridley Scott");
        assert_eq!(movie.director(), "Ridley Scott");
        let movie = movie.with_director("");
        assert_eq!(movie.director(), DEFAULT_DIRECTOR);
    }

    #[test]
    fn test_genre_tags_all_or_nothing() {
        let mut movie = item(8.0).unwrap();
        let err = movie.set_genre_tags(["drama", "space-opera"]).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownGenre(ref tag) if tag == "space-opera"));
        assert_eq!(movie.genres(), &[Genre::Horror, Genre::SciFi]);

        movie.set_genre_tags(["Drama", " war "]).unwrap();
        assert_eq!(movie.genres(), &[Genre::Drama, Genre::War]);
    }

    #[test]
    fn test_genre_names_round_trip() {
        for genre in Genre::ALL {
            assert_eq!(genre.as_str().parse::<Genre>().unwrap(), genre);
            let json = serde_json::to_string(&genre).unwrap();
            assert_eq!(json, format!("\"{}\"", genre.as_str()));
        }
    }

    #[test]
    fn test_cmp_rating_ignores_identity() {
        let a = Item::new(1, "A", vec![Genre::Drama], 1990, 7.5).unwrap();
        let b = Item::new(2, "B", vec![Genre::War], 2010, 7.5).unwrap();
        let c = Item::new(3, "C", vec![], 2010, 9.0).unwrap();

        assert_eq!(Item::cmp_rating(&a, &b), Ordering::Equal);
        assert_ne!(a, b);
        assert_eq!(Item::cmp_rating(&a, &c), Ordering::Less);
    }

    #[test]
    fn test_add_genres_skips_unknown() {
        let mut user = User::new("alex", "secret").unwrap();
        let accepted = user.add_genres(["action", "drama", "space-opera", "Drama"]);

        assert_eq!(accepted, 3);
        assert_eq!(user.preferred_genres().len(), 2);
        assert!(user.preferred_genres().contains(&Genre::Action));
        assert!(user.preferred_genres().contains(&Genre::Drama));
        assert_eq!(user.add_genres(["nope"]), 0);
    }

    #[test]
    fn test_set_preferences_replaces_set() {
        let mut user = User::new("ann", "pw")
            .unwrap()
            .with_genres([Genre::Horror, Genre::Comedy]);
        user.set_preferences([Genre::Drama, Genre::Drama, Genre::War]);

        let genres: Vec<Genre> = user.preferred_genres().iter().copied().collect();
        assert_eq!(genres, vec![Genre::Drama, Genre::War]);

        user.set_preferences(Vec::new());
        assert!(user.preferred_genres().is_empty());
    }

    #[test]
    fn test_shares_genre_with() {
        let a = User::new("a", "x").unwrap().with_genres([Genre::Horror, Genre::Comedy]);
        let b = User::new("b", "x").unwrap().with_genres([Genre::Comedy]);
        let c = User::new("c", "x").unwrap().with_genres([Genre::War]);

        assert!(a.shares_genre_with(&b));
        assert!(b.shares_genre_with(&a));
        assert!(!a.shares_genre_with(&c));
    }

    #[test]
    fn test_debug_hides_credential() {
        let user = User::new("alex", "hunter2").unwrap();
        let shown = format!("{:?}", user);
        assert!(!shown.contains("hunter2"));
        assert_eq!(user.credential(), "hunter2");
    }

    #[test]
    fn test_user_ratings() {
        let mut user = User::new("alex", "x").unwrap();
        user.rate(10, 7.0);
        user.rate(10, 9.0);
        assert_eq!(user.rating_for(10), Some(9.0));
        assert_eq!(user.rating_for(11), None);
        assert_eq!(user.ratings().len(), 1);
    }
}
