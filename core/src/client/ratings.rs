//! `/ratings` endpoints.

use super::{parse_data, parse_message, parse_optional, BookRecClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Rating;

impl BookRecClient {
    pub fn build_rate_book(&self, user_id: i64, book_id: &str, rating: f64) -> HttpRequest {
        self.request(
            HttpMethod::Post,
            &["ratings", "rate"],
            &[
                ("userId", Some(user_id.to_string())),
                ("bookId", Some(book_id.to_string())),
                ("rating", Some(rating.to_string())),
            ],
        )
    }

    pub fn build_user_book_rating(&self, user_id: i64, book_id: &str) -> HttpRequest {
        let user_id = user_id.to_string();
        self.request(
            HttpMethod::Get,
            &["ratings", "user", &user_id, "book", book_id],
            &[],
        )
    }

    pub fn build_user_ratings(&self, user_id: i64) -> HttpRequest {
        let user_id = user_id.to_string();
        self.request(HttpMethod::Get, &["ratings", "user", &user_id], &[])
    }

    pub fn build_ratings_for_book(&self, book_id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &["ratings", "book", book_id], &[])
    }

    pub fn parse_rate_book(&self, response: HttpResponse) -> Result<String, ApiError> {
        parse_message(&response)
    }

    /// `None` when the user has not rated the book.
    pub fn parse_user_book_rating(&self, response: HttpResponse) -> Result<Option<Rating>, ApiError> {
        parse_optional(&response)
    }

    pub fn parse_user_ratings(&self, response: HttpResponse) -> Result<Vec<Rating>, ApiError> {
        parse_data(&response)
    }

    pub fn parse_ratings_for_book(&self, response: HttpResponse) -> Result<Vec<Rating>, ApiError> {
        parse_data(&response)
    }
}

#[cfg(test)]
mod tests {
    use crate::client::tests::{client, ok};
    use crate::error::ApiError;
    use crate::http::HttpMethod;

    #[test]
    fn rate_book_sends_query() {
        let req = client().build_rate_book(7, "0439136350", 4.5);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.url,
            "http://localhost:8080/api/ratings/rate?userId=7&bookId=0439136350&rating=4.5"
        );
    }

    #[test]
    fn user_book_rating_path() {
        let req = client().build_user_book_rating(7, "0439136350");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/api/ratings/user/7/book/0439136350");
    }

    #[test]
    fn user_and_book_rating_lists() {
        assert_eq!(
            client().build_user_ratings(7).url,
            "http://localhost:8080/api/ratings/user/7"
        );
        assert_eq!(
            client().build_ratings_for_book("0439136350").url,
            "http://localhost:8080/api/ratings/book/0439136350"
        );
    }

    #[test]
    fn parse_rate_book_message() {
        let body = r#"{"code":200,"message":"success","data":"rating saved"}"#;
        assert_eq!(client().parse_rate_book(ok(body)).unwrap(), "rating saved");
    }

    #[test]
    fn parse_rate_book_validation_failure() {
        let body = r#"{"code":500,"message":"rating must be between 0 and 5"}"#;
        let err = client().parse_rate_book(ok(body)).unwrap_err();
        assert!(matches!(err, ApiError::Rejected { .. }));
    }

    #[test]
    fn parse_unrated_book_is_none() {
        let body = r#"{"code":200,"message":"success","data":null}"#;
        assert_eq!(client().parse_user_book_rating(ok(body)).unwrap(), None);
    }

    #[test]
    fn parse_user_ratings_list() {
        let body = r#"{"code":200,"message":"success","data":[
            {"ratingId":1,"userId":7,"bookId":"a","rating":4.0},
            {"ratingId":2,"userId":7,"bookId":"b","rating":2.5,"ratingDate":"2024-05-01T10:00:00"}]}"#;
        let ratings = client().parse_user_ratings(ok(body)).unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[1].rating, 2.5);
        assert_eq!(ratings[1].rating_date.as_deref(), Some("2024-05-01T10:00:00"));
    }
}
