//! Stateless HTTP request builder and response parser for the
//! book-recommendation API.
//!
//! # Design
//! `BookRecClient` holds only a base URL and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! caller executes the actual HTTP round-trip, keeping the core deterministic
//! and free of I/O dependencies.
//!
//! Operations are grouped by resource in submodules (`books`, `ratings`,
//! `recommendations`, `users`), each adding methods to `BookRecClient`.
//! Arguments travel as query parameters; a `None` parameter is left out of
//! the query string, and optional counts fall back to the `DEFAULT_*`
//! constants.

mod books;
mod ratings;
pub mod recommendations;
mod users;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiResponse, SUCCESS_CODE};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_POPULAR_LIMIT: u32 = 10;
pub const DEFAULT_LATEST_LIMIT: u32 = 10;
pub const DEFAULT_SIMILAR_LIMIT: u32 = 6;
pub const DEFAULT_TOP_N: u32 = 10;
pub const DEFAULT_MIN_RATING: f64 = 3.0;
pub const DEFAULT_TOP_K: u32 = 10;

/// Synchronous, stateless client for the book-recommendation API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The base URL may carry a path prefix such as
/// `/api`; endpoint paths are appended to it.
#[derive(Debug, Clone)]
pub struct BookRecClient {
    base_url: Url,
}

impl BookRecClient {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        base_url.set_query(None);
        base_url.set_fragment(None);
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Assemble a request from path segments and query parameters. Segments
    /// are percent-encoded individually, so identifiers cannot inject path
    /// separators.
    fn request(
        &self,
        method: HttpMethod,
        segments: &[&str],
        query: &[(&str, Option<String>)],
    ) -> HttpRequest {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        let present: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|value| (*key, value)))
            .collect();
        if !present.is_empty() {
            url.query_pairs_mut().extend_pairs(present);
        }

        log::debug!("Built {} {}", method, url);
        HttpRequest {
            method,
            url: url.into(),
            headers: Vec::new(),
        }
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Check the status, decode the envelope and reject failure codes.
fn parse_envelope<T: DeserializeOwned>(response: &HttpResponse) -> Result<ApiResponse<T>, ApiError> {
    check_status(response)?;
    log::trace!("Response: {}", response.body);

    let envelope: ApiResponse<T> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    if envelope.code != SUCCESS_CODE {
        return Err(ApiError::Rejected {
            code: envelope.code,
            message: envelope.message,
        });
    }
    Ok(envelope)
}

fn parse_data<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    parse_envelope(response)?.data.ok_or(ApiError::MissingData)
}

fn parse_optional<T: DeserializeOwned>(response: &HttpResponse) -> Result<Option<T>, ApiError> {
    Ok(parse_envelope(response)?.data)
}

/// For endpoints that only acknowledge: the backend puts the text in either
/// `data` or `message`, so prefer a string `data` and fall back.
fn parse_message(response: &HttpResponse) -> Result<String, ApiError> {
    let envelope = parse_envelope::<serde_json::Value>(response)?;
    match envelope.data {
        Some(serde_json::Value::String(text)) => Ok(text),
        _ => Ok(envelope.message),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const BASE_URL: &str = "http://localhost:8080/api";

    pub(crate) fn client() -> BookRecClient {
        BookRecClient::new(BASE_URL).unwrap()
    }

    pub(crate) fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = BookRecClient::new("http://localhost:8080/api/").unwrap();
        let req = client.build_popular_books(None);
        assert_eq!(req.url, "http://localhost:8080/api/books/popular?limit=10");
    }

    #[test]
    fn root_base_url_has_no_prefix() {
        let client = BookRecClient::new("http://localhost:3000").unwrap();
        let req = client.build_algorithm_info();
        assert_eq!(req.url, "http://localhost:3000/recommendations/algorithm/info");
    }

    #[test]
    fn base_url_query_is_dropped() {
        let client = BookRecClient::new("http://localhost:8080/api?debug=1").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(BookRecClient::new("not a url").is_err());
        assert!(BookRecClient::new("mailto:someone@example.com").is_err());
    }

    #[test]
    fn not_found_status() {
        let response = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: String::new(),
        };
        let err = parse_data::<serde_json::Value>(&response).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn server_error_status() {
        let response = HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: "internal error".to_string(),
        };
        let err = parse_data::<serde_json::Value>(&response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn rejected_envelope() {
        let err = parse_data::<serde_json::Value>(&ok(r#"{"code":500,"message":"nope","data":null}"#))
            .unwrap_err();
        match err {
            ApiError::Rejected { code, message } => {
                assert_eq!(code, 500);
                assert_eq!(message, "nope");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bad_json_body() {
        let err = parse_data::<serde_json::Value>(&ok("not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn missing_data() {
        let err = parse_data::<serde_json::Value>(&ok(r#"{"code":200,"message":"ok"}"#)).unwrap_err();
        assert!(matches!(err, ApiError::MissingData));
    }

    #[test]
    fn message_prefers_string_data() {
        let text = parse_message(&ok(r#"{"code":200,"message":"success","data":"rated"}"#)).unwrap();
        assert_eq!(text, "rated");
        let text = parse_message(&ok(r#"{"code":200,"message":"updated","data":null}"#)).unwrap();
        assert_eq!(text, "updated");
    }
}
