use anyhow::{anyhow, ensure, Context, Result};
use catalog::{CatalogStore, Genre, Item, ItemId, User, UserStore};
use clap::{Parser, Subcommand, ValueEnum};
use recommender::{RecommendContext, RecommendationEngine, StrategyKind, DEFAULT_LIMIT};
use std::path::PathBuf;
use tracing::info;

/// movie-recs - catalog-backed movie recommendations
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Rule-based movie recommendations over a local catalog", long_about = None)]
struct Cli {
    /// Path to the catalog JSON file
    #[arg(long, env = "MOVIE_RECS_CATALOG", default_value = "data/movies.json")]
    catalog: PathBuf,

    /// Path to the users JSON file
    #[arg(long, env = "MOVIE_RECS_USERS", default_value = "data/users.json")]
    users: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog
    Movies {
        /// Ordering of the listing
        #[arg(long, value_enum, default_value_t = SortOrder::Catalog)]
        sort: SortOrder,

        /// Reverse the sort (ratings are shown best first unless set)
        #[arg(long)]
        reverse: bool,

        /// Only show movies tagged with this genre
        #[arg(long)]
        genre: Option<Genre>,
    },

    /// Look up a movie by exact title (case-insensitive)
    Search {
        #[arg(long)]
        title: String,
    },

    /// Add a movie to the catalog
    AddMovie {
        #[arg(long)]
        id: ItemId,

        #[arg(long)]
        title: String,

        /// Comma-separated genres, e.g. horror,sci-fi
        #[arg(long, value_delimiter = ',')]
        genres: Vec<Genre>,

        #[arg(long)]
        year: i32,

        /// Rating from 0 to 10
        #[arg(long)]
        rating: f32,

        #[arg(long)]
        director: Option<String>,
    },

    /// Change fields of an existing movie
    UpdateMovie {
        #[arg(long)]
        id: ItemId,

        #[arg(long)]
        title: Option<String>,

        /// Comma-separated genres, replaces the current ones
        #[arg(long, value_delimiter = ',')]
        genres: Option<Vec<Genre>>,

        #[arg(long)]
        year: Option<i32>,

        /// Rating from 0 to 10
        #[arg(long)]
        rating: Option<f32>,

        #[arg(long)]
        director: Option<String>,
    },

    /// Remove a movie from the catalog
    RemoveMovie {
        #[arg(long)]
        id: ItemId,
    },

    /// Register a new user
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        password: String,

        /// Comma-separated preferred genres; unknown ones are skipped
        #[arg(long, value_delimiter = ',')]
        genres: Vec<String>,
    },

    /// Add preferred genres to a user
    Prefer {
        #[arg(long)]
        user: String,

        /// Comma-separated genres; unknown ones are skipped
        #[arg(long, value_delimiter = ',', required = true)]
        genres: Vec<String>,

        /// Replace the preferences instead of adding; only genres present
        /// in the catalog are kept
        #[arg(long)]
        replace: bool,
    },

    /// Record a user's score for a movie
    Rate {
        #[arg(long)]
        user: String,

        #[arg(long)]
        movie_id: ItemId,

        /// Score from 1 to 10
        #[arg(long)]
        score: f32,
    },

    /// Get recommendations
    Recommend {
        /// Acting user (required by the genre and similar-users strategies)
        #[arg(long)]
        user: Option<String>,

        /// genre | top-rated | similar-users (or 1, 2, 3)
        #[arg(long, default_value = "genre")]
        strategy: StrategyKind,

        /// Number of recommendations, applied before the thresholds
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Drop recommendations rated below this
        #[arg(long)]
        min_rating: Option<f32>,

        /// Drop recommendations released before this year
        #[arg(long)]
        min_year: Option<i32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortOrder {
    Catalog,
    Rating,
    Year,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = CatalogStore::open_path(&cli.catalog)
        .with_context(|| format!("Failed to open catalog {}", cli.catalog.display()))?;
    let users = UserStore::open_path(&cli.users)
        .with_context(|| format!("Failed to open users {}", cli.users.display()))?;
    info!(movies = catalog.len(), users = users.len(), "Stores ready");

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Movies {
            sort,
            reverse,
            genre,
        } => handle_movies(&catalog, sort, reverse, genre),
        Commands::Search { title } => handle_search(&catalog, &title),
        Commands::AddMovie {
            id,
            title,
            genres,
            year,
            rating,
            director,
        } => {
            let mut item = Item::new(id, title, genres, year, rating)?;
            if let Some(director) = director {
                item.set_director(director);
            }
            handle_add_movie(catalog, item)
        }
        Commands::UpdateMovie {
            id,
            title,
            genres,
            year,
            rating,
            director,
        } => {
            let changes = MovieChanges {
                title,
                genres,
                year,
                rating,
                director,
            };
            handle_update_movie(catalog, id, changes)
        }
        Commands::RemoveMovie { id } => handle_remove_movie(catalog, id),
        Commands::Register {
            name,
            password,
            genres,
        } => handle_register(users, name, password, genres),
        Commands::Prefer {
            user,
            genres,
            replace,
        } => handle_prefer(&catalog, users, &user, genres, replace),
        Commands::Rate {
            user,
            movie_id,
            score,
        } => handle_rate(&catalog, users, &user, movie_id, score),
        Commands::Recommend {
            user,
            strategy,
            limit,
            min_rating,
            min_year,
        } => handle_recommend(
            &catalog,
            &users,
            user.as_deref(),
            strategy,
            limit,
            min_rating,
            min_year,
        ),
    }
}

/// Handle the 'movies' command
fn handle_movies(
    catalog: &CatalogStore,
    sort: SortOrder,
    reverse: bool,
    genre: Option<Genre>,
) -> Result<()> {
    let mut listing: Vec<&Item> = match sort {
        SortOrder::Catalog => catalog.items().iter().collect(),
        SortOrder::Rating => catalog.sort_by_rating(!reverse),
        SortOrder::Year => catalog.sort_by_year(reverse),
    };
    if matches!(sort, SortOrder::Catalog) && reverse {
        listing.reverse();
    }
    if let Some(genre) = genre {
        listing.retain(|item| item.genres().contains(&genre));
    }

    if listing.is_empty() {
        println!("No movies to show.");
        return Ok(());
    }
    print_items("Movies:", listing);
    Ok(())
}

/// Handle the 'search' command
fn handle_search(catalog: &CatalogStore, title: &str) -> Result<()> {
    let item = catalog
        .lookup_by_title(title)
        .ok_or_else(|| anyhow!("No movie titled '{}'", title))?;
    println!("[{}] {}", item.id(), item);
    Ok(())
}

/// Handle the 'add-movie' command
fn handle_add_movie(mut catalog: CatalogStore, item: Item) -> Result<()> {
    let id = item.id();
    catalog.add(item)?;
    println!("Added movie {}.", id);
    Ok(())
}

/// Optional field updates for 'update-movie'
struct MovieChanges {
    title: Option<String>,
    genres: Option<Vec<Genre>>,
    year: Option<i32>,
    rating: Option<f32>,
    director: Option<String>,
}

/// Handle the 'update-movie' command
fn handle_update_movie(mut catalog: CatalogStore, id: ItemId, changes: MovieChanges) -> Result<()> {
    let mut item = catalog
        .lookup_by_id(id)
        .ok_or_else(|| anyhow!("Movie {} not found", id))?
        .clone();

    if let Some(title) = changes.title {
        item.set_title(title)?;
    }
    if let Some(genres) = changes.genres {
        item.set_genres(genres);
    }
    if let Some(year) = changes.year {
        item.set_year(year);
    }
    if let Some(rating) = changes.rating {
        item.set_rating(rating)?;
    }
    if let Some(director) = changes.director {
        item.set_director(director);
    }

    catalog.replace(item)?;
    println!("Updated movie {}.", id);
    Ok(())
}

/// Handle the 'remove-movie' command
fn handle_remove_movie(mut catalog: CatalogStore, id: ItemId) -> Result<()> {
    let removed = catalog.remove(id)?;
    println!("Removed '{}'.", removed.title());
    Ok(())
}

/// Handle the 'register' command
fn handle_register(
    mut users: UserStore,
    name: String,
    password: String,
    genres: Vec<String>,
) -> Result<()> {
    let id = users.register(name, password)?;
    if !genres.is_empty() {
        let mut user = find_user_by_id(&users, id)?.clone();
        let accepted = user.add_genres(&genres);
        users.replace(user)?;
        println!("Accepted {} of {} genres.", accepted, genres.len());
    }
    println!("Registered user {}.", id);
    Ok(())
}

/// Handle the 'prefer' command
fn handle_prefer(
    catalog: &CatalogStore,
    mut users: UserStore,
    name: &str,
    genres: Vec<String>,
    replace: bool,
) -> Result<()> {
    let mut user = find_user(&users, name)?.clone();

    if replace {
        let available = catalog.genres_in_use();
        let chosen: Vec<Genre> = genres
            .iter()
            .filter_map(|tag| tag.parse::<Genre>().ok())
            .filter(|genre| available.contains(genre))
            .collect();
        ensure!(
            !chosen.is_empty(),
            "None of the genres appear in the catalog (available: {})",
            available.iter().map(Genre::as_str).collect::<Vec<_>>().join(", ")
        );
        user.set_preferences(chosen);
        let count = user.preferred_genres().len();
        users.replace(user)?;
        println!("Preferences set to {} genres.", count);
        return Ok(());
    }

    let accepted = user.add_genres(&genres);
    if accepted == 0 {
        println!("No genres added (none are in the vocabulary).");
        return Ok(());
    }
    users.replace(user)?;
    println!("Added {} genres.", accepted);
    Ok(())
}

/// Handle the 'rate' command
fn handle_rate(
    catalog: &CatalogStore,
    mut users: UserStore,
    name: &str,
    movie_id: ItemId,
    score: f32,
) -> Result<()> {
    ensure!((1.0..=10.0).contains(&score), "Score must be between 1 and 10");
    let item = catalog
        .lookup_by_id(movie_id)
        .ok_or_else(|| anyhow!("Movie {} not found", movie_id))?;

    let mut user = find_user(&users, name)?.clone();
    user.rate(movie_id, score);
    users.replace(user)?;
    println!("Rated '{}' {}.", item.title(), score);
    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    catalog: &CatalogStore,
    users: &UserStore,
    name: Option<&str>,
    strategy: StrategyKind,
    limit: usize,
    min_rating: Option<f32>,
    min_year: Option<i32>,
) -> Result<()> {
    let acting = name.map(|name| find_user(users, name)).transpose()?;
    let mut context = RecommendContext::anonymous()
        .with_users(users.users())
        .with_limit(limit);
    context.user = acting;

    let engine = RecommendationEngine::with_kind(strategy);
    let shown = engine.recommend_filtered(catalog.items(), &context, min_rating, min_year)?;

    if shown.is_empty() {
        println!("No matching movies.");
        return Ok(());
    }
    print_items(&format!("Recommended ({}):", engine.strategy_name()), shown.iter());
    Ok(())
}

fn find_user<'a>(users: &'a UserStore, name: &str) -> Result<&'a User> {
    users
        .find_by_name(name)
        .ok_or_else(|| anyhow!("User '{}' not found", name))
}

fn find_user_by_id(users: &UserStore, id: u32) -> Result<&User> {
    users
        .lookup_by_id(id)
        .ok_or_else(|| anyhow!("User {} not found", id))
}

/// Helper function to print a numbered list of movies
fn print_items<'a>(header: &str, items: impl IntoIterator<Item = &'a Item>) {
    println!("{}", header);
    for (rank, item) in items.into_iter().enumerate() {
        println!(
            "{}. [{}] {} ({}) - rating: {}",
            rank + 1,
            item.id(),
            item.title(),
            item.year(),
            item.rating()
        );
    }
}
