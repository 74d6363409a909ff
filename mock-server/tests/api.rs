use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, Envelope, ERROR_CODE, SUCCESS_CODE};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

/// Send one request through a clone of `router`; clones share the store.
async fn call(router: &Router, method: &str, uri: &str) -> Envelope {
    let resp = router.clone().oneshot(request(method, uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "{method} {uri}");
    body_json(resp).await
}

// --- books ---

#[tokio::test]
async fn list_books_defaults_to_first_page() {
    let resp = app().oneshot(request("GET", "/books")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let env: Envelope = body_json(resp).await;
    assert_eq!(env.code, SUCCESS_CODE);
    assert_eq!(env.data["total"], 5);
    assert_eq!(env.data["current"], 1);
    assert_eq!(env.data["records"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn list_books_filters_by_keyword_and_pages() {
    let resp = app()
        .oneshot(request("GET", "/books?page=2&size=1&keyword=tolkien"))
        .await
        .unwrap();

    let env: Envelope = body_json(resp).await;
    assert_eq!(env.data["total"], 2);
    let records = env.data["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["author"], "J. R. R. Tolkien");
}

#[tokio::test]
async fn list_books_past_the_end_is_empty() {
    let router = app();
    let env = call(&router, "GET", "/books?page=18446744073709551615&size=2").await;
    assert_eq!(env.code, SUCCESS_CODE);
    assert_eq!(env.data["total"], 5);
    assert!(env.data["records"].as_array().unwrap().is_empty());

    let env = call(&router, "GET", "/books?page=2&size=18446744073709551615").await;
    assert!(env.data["records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn book_detail_unknown_is_rejected_in_envelope() {
    let resp = app().oneshot(request("GET", "/books/nope")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let env: Envelope = body_json(resp).await;
    assert_eq!(env.code, ERROR_CODE);
    assert!(env.data.is_null());
}

#[tokio::test]
async fn popular_is_not_shadowed_by_detail_route() {
    let resp = app()
        .oneshot(request("GET", "/books/popular?limit=2"))
        .await
        .unwrap();

    let env: Envelope = body_json(resp).await;
    assert_eq!(env.code, SUCCESS_CODE);
    assert_eq!(env.data.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn similar_books_falls_back_to_same_author() {
    let resp = app()
        .oneshot(request("GET", "/books/0345339681/similar?limit=6"))
        .await
        .unwrap();

    let env: Envelope = body_json(resp).await;
    let books = env.data.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["bookId"], "0618002227");
}

#[tokio::test]
async fn unknown_path_is_404() {
    let resp = app().oneshot(request("GET", "/authors")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_query_is_400() {
    let resp = app()
        .oneshot(request("POST", "/ratings/rate?userId=abc&bookId=x&rating=1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- users ---

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let router = app();
    let env = call(&router, "POST", "/users/register?username=ada&password=right").await;
    assert_eq!(env.code, SUCCESS_CODE);

    let env = call(&router, "POST", "/users/login?username=ada&password=wrong").await;
    assert_eq!(env.code, ERROR_CODE);
}

#[tokio::test]
async fn negative_age_is_stored_as_sent() {
    let router = app();
    let ada = call(&router, "POST", "/users/register?username=ada&password=pw").await;
    let ada_id = ada.data["userId"].as_i64().unwrap();

    let env = call(&router, "PUT", &format!("/users/{ada_id}?age=-1")).await;
    assert_eq!(env.code, SUCCESS_CODE);

    let login = call(&router, "POST", "/users/login?username=ada&password=pw").await;
    assert_eq!(login.data["user"]["age"], -1);
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let router = app();
    let first = call(&router, "POST", "/users/register?username=ada&password=x").await;
    assert_eq!(first.code, SUCCESS_CODE);
    assert!(first.data.get("password").is_none());

    let second = call(&router, "POST", "/users/register?username=ada&password=y").await;
    assert_eq!(second.code, ERROR_CODE);
}

// --- full lifecycle ---

#[tokio::test]
async fn rating_lifecycle() {
    let router = app();

    // register two readers and log one in
    let ada = call(&router, "POST", "/users/register?username=ada&password=pw&email=ada%40example.com").await;
    let ada_id = ada.data["userId"].as_i64().unwrap();
    let bob = call(&router, "POST", "/users/register?username=bob&password=pw").await;
    let bob_id = bob.data["userId"].as_i64().unwrap();

    let login = call(&router, "POST", "/users/login?username=ada&password=pw").await;
    assert_eq!(login.code, SUCCESS_CODE);
    assert_eq!(login.data["user"]["username"], "ada");
    assert!(!login.data["token"].as_str().unwrap().is_empty());

    // rate: invalid values are refused
    let env = call(&router, "POST", &format!("/ratings/rate?userId={ada_id}&bookId=0345339681&rating=5.5")).await;
    assert_eq!(env.code, ERROR_CODE);
    let env = call(&router, "POST", &format!("/ratings/rate?userId={ada_id}&bookId=0345339681&rating=4.2")).await;
    assert_eq!(env.code, ERROR_CODE);

    // rate: valid values are stored
    let env = call(&router, "POST", &format!("/ratings/rate?userId={ada_id}&bookId=0345339681&rating=4.5")).await;
    assert_eq!(env.code, SUCCESS_CODE);
    let env = call(&router, "POST", &format!("/ratings/rate?userId={bob_id}&bookId=0345339681&rating=3.5")).await;
    assert_eq!(env.code, SUCCESS_CODE);
    let env = call(&router, "POST", &format!("/ratings/rate?userId={bob_id}&bookId=0451524934&rating=5")).await;
    assert_eq!(env.code, SUCCESS_CODE);

    // read back
    let env = call(&router, "GET", &format!("/ratings/user/{ada_id}/book/0345339681")).await;
    assert_eq!(env.data["rating"], 4.5);
    let env = call(&router, "GET", &format!("/ratings/user/{ada_id}/book/0451524934")).await;
    assert!(env.data.is_null());
    let env = call(&router, "GET", "/ratings/book/0345339681").await;
    assert_eq!(env.data.as_array().unwrap().len(), 2);
    let env = call(&router, "GET", &format!("/users/{bob_id}/ratings")).await;
    assert_eq!(env.data.as_array().unwrap().len(), 2);

    let env = call(&router, "GET", "/books/0345339681").await;
    assert_eq!(env.data["ratingCount"], 2);
    assert_eq!(env.data["avgRating"], 4.0);

    // recommendations skip already-rated books
    let env = call(&router, "POST", &format!("/recommendations/user-based?userId={ada_id}&topN=10&minRating=3")).await;
    let recs = env.data["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0]["book_id"], "0451524934");

    let env = call(&router, "POST", &format!("/recommendations/similar-users?userId={ada_id}&topK=10")).await;
    let similar: Vec<Value> = env.data["similar_users"].as_array().unwrap().clone();
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0]["user_id"], bob_id);

    // profile update
    let env = call(&router, "PUT", &format!("/users/{ada_id}?location=Paris&age=30&country=FR")).await;
    assert_eq!(env.code, SUCCESS_CODE);
    let env = call(&router, "GET", &format!("/users/{ada_id}")).await;
    assert_eq!(env.data["location"], "Paris");
    assert_eq!(env.data["age"], 30);
    assert_eq!(env.data["email"], "ada@example.com");
}

#[tokio::test]
async fn health_and_info() {
    let router = app();
    let env = call(&router, "GET", "/recommendations/health").await;
    assert_eq!(env.data, Value::Bool(true));

    let env = call(&router, "GET", "/recommendations/algorithm/info").await;
    assert_eq!(env.code, SUCCESS_CODE);
    assert!(env.data["algorithms"].is_array());
}
