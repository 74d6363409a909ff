//! In-memory stand-in for the book-recommendation backend.
//!
//! Serves the same paths and `{code, message, data}` envelope as the real
//! service. Application failures are answered with HTTP 200 and a non-200
//! envelope code, like the backend does. Recommendation endpoints return
//! canned results derived from the stored ratings; there is no filtering
//! algorithm here.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SUCCESS_CODE: i32 = 200;
pub const ERROR_CODE: i32 = 500;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i32,
    pub message: String,
    pub data: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub publisher: Option<String>,
    pub year: Option<i32>,
    pub avg_rating: f64,
    pub rating_count: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub rating_id: i64,
    pub user_id: i64,
    pub book_id: String,
    pub rating: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub location: Option<String>,
    pub age: Option<i32>,
    pub country: Option<String>,
    pub status: i32,
}

#[derive(Debug, Default)]
pub struct Store {
    pub users: BTreeMap<i64, User>,
    pub books: BTreeMap<String, Book>,
    pub ratings: Vec<Rating>,
    next_user_id: i64,
    next_rating_id: i64,
}

impl Store {
    /// A store holding a small fixed catalogue and no users.
    pub fn seeded() -> Self {
        let mut store = Self {
            next_user_id: 1,
            next_rating_id: 1,
            ..Self::default()
        };
        let catalogue = [
            ("0439136350", "Harry Potter and the Prisoner of Azkaban", "J. K. Rowling", 1999),
            ("0439139597", "Harry Potter and the Goblet of Fire", "J. K. Rowling", 2000),
            ("0345339681", "The Hobbit", "J. R. R. Tolkien", 1986),
            ("0618002227", "The Fellowship of the Ring", "J. R. R. Tolkien", 1999),
            ("0451524934", "1984", "George Orwell", 1990),
        ];
        for (id, title, author, year) in catalogue {
            let _ = store.books.insert(
                id.to_string(),
                Book {
                    book_id: id.to_string(),
                    title: title.to_string(),
                    author: author.to_string(),
                    publisher: None,
                    year: Some(year),
                    avg_rating: 0.0,
                    rating_count: 0,
                },
            );
        }
        store
    }

    fn ratings_by_user(&self, user_id: i64) -> Vec<Rating> {
        self.ratings
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    fn ratings_for_book(&self, book_id: &str) -> Vec<Rating> {
        self.ratings
            .iter()
            .filter(|r| r.book_id == book_id)
            .cloned()
            .collect()
    }

    fn upsert_rating(&mut self, user_id: i64, book_id: &str, value: f64) {
        match self
            .ratings
            .iter_mut()
            .find(|r| r.user_id == user_id && r.book_id == book_id)
        {
            Some(existing) => existing.rating = value,
            None => {
                self.ratings.push(Rating {
                    rating_id: self.next_rating_id,
                    user_id,
                    book_id: book_id.to_string(),
                    rating: value,
                });
                self.next_rating_id += 1;
            }
        }

        let scores: Vec<f64> = self
            .ratings
            .iter()
            .filter(|r| r.book_id == book_id)
            .map(|r| r.rating)
            .collect();
        if let Some(book) = self.books.get_mut(book_id) {
            book.rating_count = scores.len() as u32;
            book.avg_rating = scores.iter().sum::<f64>() / scores.len() as f64;
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    Router::new()
        .route("/books", get(list_books))
        .route("/books/popular", get(popular_books))
        .route("/books/latest", get(latest_books))
        .route("/books/{id}", get(book_detail))
        .route("/books/{id}/similar", get(similar_books))
        .route("/books/{id}/ratings", get(book_ratings))
        .route("/ratings/rate", post(rate_book))
        .route("/ratings/user/{uid}/book/{bid}", get(user_book_rating))
        .route("/ratings/user/{uid}", get(user_ratings))
        .route("/ratings/book/{id}", get(book_ratings))
        .route("/recommendations/user-based", post(recommendations))
        .route("/recommendations/item-based", post(recommendations))
        .route("/recommendations/similar-users", post(similar_users))
        .route("/recommendations/algorithm/info", get(algorithm_info))
        .route("/recommendations/health", get(health))
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/{id}", get(user_info).put(update_user))
        .route("/users/{id}/ratings", get(user_ratings))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn success<T: Serialize>(data: T) -> Json<Envelope> {
    success_with("success", data)
}

fn success_with<T: Serialize>(message: &str, data: T) -> Json<Envelope> {
    Json(Envelope {
        code: SUCCESS_CODE,
        message: message.to_string(),
        data: serde_json::to_value(data).unwrap_or(Value::Null),
    })
}

fn failure(message: &str) -> Json<Envelope> {
    Json(Envelope {
        code: ERROR_CODE,
        message: message.to_string(),
        data: Value::Null,
    })
}

#[derive(Deserialize)]
struct ListParams {
    page: Option<u64>,
    size: Option<u64>,
    keyword: Option<String>,
}

#[derive(Deserialize)]
struct LimitParams {
    limit: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateParams {
    user_id: i64,
    book_id: String,
    rating: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendParams {
    user_id: i64,
    top_n: Option<usize>,
    min_rating: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimilarUsersParams {
    user_id: i64,
    top_k: Option<usize>,
}

#[derive(Deserialize)]
struct RegisterParams {
    username: String,
    password: String,
    email: Option<String>,
}

#[derive(Deserialize)]
struct LoginParams {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct UpdateParams {
    nickname: Option<String>,
    email: Option<String>,
    location: Option<String>,
    age: Option<i32>,
    country: Option<String>,
}

async fn list_books(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Envelope> {
    let store = db.read().await;
    let page = params.page.unwrap_or(1).max(1);
    let size = params.size.unwrap_or(20).max(1);
    let keyword = params.keyword.unwrap_or_default().to_lowercase();

    let matching: Vec<&Book> = store
        .books
        .values()
        .filter(|b| {
            keyword.is_empty()
                || b.title.to_lowercase().contains(&keyword)
                || b.author.to_lowercase().contains(&keyword)
        })
        .collect();
    let offset = page.saturating_sub(1).saturating_mul(size);
    let records: Vec<&Book> = matching
        .iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(size).unwrap_or(usize::MAX))
        .copied()
        .collect();

    success(json!({
        "records": records,
        "total": matching.len(),
        "current": page,
        "size": size,
    }))
}

async fn book_detail(State(db): State<Db>, Path(id): Path<String>) -> Json<Envelope> {
    let store = db.read().await;
    match store.books.get(&id) {
        Some(book) => success(book),
        None => failure("book not found"),
    }
}

async fn popular_books(State(db): State<Db>, Query(params): Query<LimitParams>) -> Json<Envelope> {
    let store = db.read().await;
    let mut books: Vec<&Book> = store.books.values().collect();
    books.sort_by(|a, b| b.rating_count.cmp(&a.rating_count));
    books.truncate(params.limit.unwrap_or(10));
    success(books)
}

async fn latest_books(State(db): State<Db>, Query(params): Query<LimitParams>) -> Json<Envelope> {
    let store = db.read().await;
    let mut books: Vec<&Book> = store.books.values().collect();
    books.sort_by(|a, b| b.year.cmp(&a.year));
    books.truncate(params.limit.unwrap_or(10));
    success(books)
}

/// Same-author fallback, which is what the backend answers when the
/// recommender has nothing.
async fn similar_books(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<LimitParams>,
) -> Json<Envelope> {
    let store = db.read().await;
    let Some(book) = store.books.get(&id) else {
        return success(Vec::<Book>::new());
    };
    let books: Vec<&Book> = store
        .books
        .values()
        .filter(|b| b.author == book.author && b.book_id != book.book_id)
        .take(params.limit.unwrap_or(6))
        .collect();
    success(books)
}

async fn book_ratings(State(db): State<Db>, Path(id): Path<String>) -> Json<Envelope> {
    success(db.read().await.ratings_for_book(&id))
}

async fn rate_book(State(db): State<Db>, Query(params): Query<RateParams>) -> Json<Envelope> {
    if !(0.0..=5.0).contains(&params.rating) {
        return failure("rating must be between 0 and 5");
    }
    if (params.rating * 2.0).fract() != 0.0 {
        return failure("rating must be a multiple of 0.5");
    }

    let mut store = db.write().await;
    if !store.users.contains_key(&params.user_id) {
        return failure("user not found");
    }
    if !store.books.contains_key(&params.book_id) {
        return failure("book not found");
    }
    store.upsert_rating(params.user_id, &params.book_id, params.rating);
    success("rating saved")
}

async fn user_book_rating(
    State(db): State<Db>,
    Path((uid, bid)): Path<(i64, String)>,
) -> Json<Envelope> {
    let store = db.read().await;
    let rating = store
        .ratings
        .iter()
        .find(|r| r.user_id == uid && r.book_id == bid);
    success(rating)
}

async fn user_ratings(State(db): State<Db>, Path(uid): Path<i64>) -> Json<Envelope> {
    success(db.read().await.ratings_by_user(uid))
}

/// Unrated books at or above `minRating`, best first.
async fn recommendations(
    State(db): State<Db>,
    Query(params): Query<RecommendParams>,
) -> Json<Envelope> {
    let store = db.read().await;
    if !store.users.contains_key(&params.user_id) {
        return failure("user not found");
    }
    let rated: Vec<String> = store
        .ratings_by_user(params.user_id)
        .into_iter()
        .map(|r| r.book_id)
        .collect();
    let min_rating = params.min_rating.unwrap_or(3.0);

    let mut candidates: Vec<&Book> = store
        .books
        .values()
        .filter(|b| !rated.contains(&b.book_id) && b.avg_rating >= min_rating)
        .collect();
    candidates.sort_by(|a, b| b.avg_rating.total_cmp(&a.avg_rating));
    candidates.truncate(params.top_n.unwrap_or(10));

    let items: Vec<Value> = candidates
        .iter()
        .map(|b| json!({ "book_id": b.book_id, "title": b.title, "predicted_rating": b.avg_rating }))
        .collect();
    success_with(
        "recommendations generated",
        json!({ "user_id": params.user_id, "recommendations": items }),
    )
}

/// Users who rated at least one of the same books, by overlap.
async fn similar_users(
    State(db): State<Db>,
    Query(params): Query<SimilarUsersParams>,
) -> Json<Envelope> {
    let store = db.read().await;
    if !store.users.contains_key(&params.user_id) {
        return failure("user not found");
    }
    let mine: Vec<String> = store
        .ratings_by_user(params.user_id)
        .into_iter()
        .map(|r| r.book_id)
        .collect();

    let mut overlaps: Vec<(i64, usize)> = store
        .users
        .keys()
        .filter(|&&id| id != params.user_id)
        .map(|&id| {
            let common = store
                .ratings_by_user(id)
                .iter()
                .filter(|r| mine.contains(&r.book_id))
                .count();
            (id, common)
        })
        .filter(|&(_, common)| common > 0)
        .collect();
    overlaps.sort_by(|a, b| b.1.cmp(&a.1));
    overlaps.truncate(params.top_k.unwrap_or(10));

    let users: Vec<Value> = overlaps
        .into_iter()
        .map(|(id, common)| json!({ "user_id": id, "common_ratings": common }))
        .collect();
    success(json!({ "user_id": params.user_id, "similar_users": users }))
}

async fn algorithm_info() -> Json<Envelope> {
    success(json!({
        "algorithms": ["user_based_cf", "item_based_cf"],
        "similarity": "cosine",
        "service": "mock",
    }))
}

async fn health() -> Json<Envelope> {
    success_with("recommender is up", true)
}

async fn register(State(db): State<Db>, Query(params): Query<RegisterParams>) -> Json<Envelope> {
    let mut store = db.write().await;
    if store.users.values().any(|u| u.username == params.username) {
        return failure("username already exists");
    }
    let user = User {
        user_id: store.next_user_id,
        username: params.username,
        password: params.password,
        email: params.email,
        nickname: None,
        location: None,
        age: None,
        country: None,
        status: 1,
    };
    store.next_user_id += 1;
    let _ = store.users.insert(user.user_id, user.clone());
    success_with("registered", user)
}

async fn login(State(db): State<Db>, Query(params): Query<LoginParams>) -> Json<Envelope> {
    let store = db.read().await;
    let user = store
        .users
        .values()
        .find(|u| u.username == params.username && u.password == params.password);
    match user {
        Some(user) => success_with(
            "login ok",
            json!({ "user": user, "token": Uuid::new_v4().simple().to_string() }),
        ),
        None => failure("invalid username or password"),
    }
}

async fn user_info(State(db): State<Db>, Path(id): Path<i64>) -> Json<Envelope> {
    let store = db.read().await;
    match store.users.get(&id) {
        Some(user) => success(user),
        None => failure("user not found"),
    }
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(params): Query<UpdateParams>,
) -> Json<Envelope> {
    let mut store = db.write().await;
    let Some(user) = store.users.get_mut(&id) else {
        return failure("user not found");
    };
    if let Some(nickname) = params.nickname {
        user.nickname = Some(nickname);
    }
    if let Some(email) = params.email {
        user.email = Some(email);
    }
    if let Some(location) = params.location {
        user.location = Some(location);
    }
    if let Some(age) = params.age {
        user.age = Some(age);
    }
    if let Some(country) = params.country {
        user.country = Some(country);
    }
    success("profile updated")
}
