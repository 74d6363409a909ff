use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub(crate) struct Args {
    /// Base URL of the book-recommendation API, including any path prefix.
    #[arg(long, env = "BOOKREC_API_URL", default_value = DEFAULT_API_URL)]
    pub(crate) api_url: String,

    /// Directory holding the persisted session. Defaults to the platform's
    /// data directory.
    #[arg(long, env = "BOOKREC_DATA_DIR")]
    pub(crate) data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub(crate) enum Command {
    /// Create an account.
    Register {
        username: String,
        #[arg(long, env = "BOOKREC_PASSWORD")]
        password: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Log in and remember the session.
    Login {
        username: String,
        #[arg(long, env = "BOOKREC_PASSWORD")]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show the logged-in profile.
    Whoami,
    /// Update profile fields.
    Profile(ProfileArgs),
    /// Page through the catalogue.
    Books {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        size: Option<u32>,
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Show one book.
    Book { book_id: String },
    Popular {
        #[arg(long)]
        limit: Option<u32>,
    },
    Latest {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Books similar to the given one.
    Similar {
        book_id: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// All ratings of a book.
    BookRatings { book_id: String },
    /// Rate a book from 0 to 5 in steps of 0.5.
    Rate { book_id: String, rating: f64 },
    /// Your rating of a book.
    MyRating { book_id: String },
    /// Everything you have rated.
    MyRatings,
    /// Personal recommendations.
    Recommend {
        /// Use item-based instead of user-based collaborative filtering.
        #[arg(long)]
        item_based: bool,
        #[arg(long)]
        top_n: Option<u32>,
        #[arg(long)]
        min_rating: Option<f64>,
    },
    /// Readers with similar taste.
    SimilarUsers {
        #[arg(long)]
        top_k: Option<u32>,
    },
    /// Describe the recommendation algorithms.
    Algorithm,
    /// Check that the recommender is up.
    Health,
}

#[derive(Debug, Clone, Default, ClapArgs)]
pub(crate) struct ProfileArgs {
    #[arg(long)]
    pub(crate) nickname: Option<String>,
    #[arg(long)]
    pub(crate) email: Option<String>,
    #[arg(long)]
    pub(crate) location: Option<String>,
    #[arg(long)]
    pub(crate) age: Option<u32>,
    #[arg(long)]
    pub(crate) country: Option<String>,
}
