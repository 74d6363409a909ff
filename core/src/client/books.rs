//! `/books` endpoints.

use serde_json::Value;

use super::{
    parse_data, BookRecClient, DEFAULT_LATEST_LIMIT, DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
    DEFAULT_POPULAR_LIMIT, DEFAULT_SIMILAR_LIMIT,
};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Book, Page, Rating};

impl BookRecClient {
    /// Page through the catalogue. The keyword is always sent, empty when
    /// absent.
    pub fn build_list_books(
        &self,
        page: Option<u32>,
        size: Option<u32>,
        keyword: Option<&str>,
    ) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            &["books"],
            &[
                ("page", Some(page.unwrap_or(DEFAULT_PAGE).to_string())),
                ("size", Some(size.unwrap_or(DEFAULT_PAGE_SIZE).to_string())),
                ("keyword", Some(keyword.unwrap_or_default().to_string())),
            ],
        )
    }

    pub fn build_book_detail(&self, book_id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &["books", book_id], &[])
    }

    pub fn build_popular_books(&self, limit: Option<u32>) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            &["books", "popular"],
            &[("limit", Some(limit.unwrap_or(DEFAULT_POPULAR_LIMIT).to_string()))],
        )
    }

    pub fn build_latest_books(&self, limit: Option<u32>) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            &["books", "latest"],
            &[("limit", Some(limit.unwrap_or(DEFAULT_LATEST_LIMIT).to_string()))],
        )
    }

    pub fn build_similar_books(
        &self,
        book_id: &str,
        user_id: Option<i64>,
        limit: Option<u32>,
    ) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            &["books", book_id, "similar"],
            &[
                ("userId", user_id.map(|id| id.to_string())),
                ("limit", Some(limit.unwrap_or(DEFAULT_SIMILAR_LIMIT).to_string())),
            ],
        )
    }

    pub fn build_book_ratings(&self, book_id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &["books", book_id, "ratings"], &[])
    }

    pub fn parse_list_books(&self, response: HttpResponse) -> Result<Page<Book>, ApiError> {
        parse_data(&response)
    }

    pub fn parse_book_detail(&self, response: HttpResponse) -> Result<Book, ApiError> {
        parse_data(&response)
    }

    pub fn parse_popular_books(&self, response: HttpResponse) -> Result<Vec<Book>, ApiError> {
        parse_data(&response)
    }

    pub fn parse_latest_books(&self, response: HttpResponse) -> Result<Vec<Book>, ApiError> {
        parse_data(&response)
    }

    /// The payload is either the recommender's result or a same-author
    /// fallback list, so it is handed back unshaped.
    pub fn parse_similar_books(&self, response: HttpResponse) -> Result<Value, ApiError> {
        parse_data(&response)
    }

    pub fn parse_book_ratings(&self, response: HttpResponse) -> Result<Vec<Rating>, ApiError> {
        parse_data(&response)
    }
}
