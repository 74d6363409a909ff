//! `/recommendations` endpoints.
//!
//! The backend forwards these payloads from the algorithm service without
//! reshaping them, so results are returned as raw JSON values.

use serde_json::Value;

use super::{parse_data, BookRecClient, DEFAULT_MIN_RATING, DEFAULT_TOP_K, DEFAULT_TOP_N};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Which collaborative-filtering flavour to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    UserBased,
    ItemBased,
}

impl Strategy {
    fn segment(self) -> &'static str {
        match self {
            Strategy::UserBased => "user-based",
            Strategy::ItemBased => "item-based",
        }
    }
}

impl BookRecClient {
    pub fn build_recommendations(
        &self,
        strategy: Strategy,
        user_id: i64,
        top_n: Option<u32>,
        min_rating: Option<f64>,
    ) -> HttpRequest {
        self.request(
            HttpMethod::Post,
            &["recommendations", strategy.segment()],
            &[
                ("userId", Some(user_id.to_string())),
                ("topN", Some(top_n.unwrap_or(DEFAULT_TOP_N).to_string())),
                (
                    "minRating",
                    Some(min_rating.unwrap_or(DEFAULT_MIN_RATING).to_string()),
                ),
            ],
        )
    }

    pub fn build_user_based_recommendations(
        &self,
        user_id: i64,
        top_n: Option<u32>,
        min_rating: Option<f64>,
    ) -> HttpRequest {
        self.build_recommendations(Strategy::UserBased, user_id, top_n, min_rating)
    }

    pub fn build_item_based_recommendations(
        &self,
        user_id: i64,
        top_n: Option<u32>,
        min_rating: Option<f64>,
    ) -> HttpRequest {
        self.build_recommendations(Strategy::ItemBased, user_id, top_n, min_rating)
    }

    pub fn build_similar_users(&self, user_id: i64, top_k: Option<u32>) -> HttpRequest {
        self.request(
            HttpMethod::Post,
            &["recommendations", "similar-users"],
            &[
                ("userId", Some(user_id.to_string())),
                ("topK", Some(top_k.unwrap_or(DEFAULT_TOP_K).to_string())),
            ],
        )
    }

    pub fn build_algorithm_info(&self) -> HttpRequest {
        self.request(HttpMethod::Get, &["recommendations", "algorithm", "info"], &[])
    }

    pub fn build_recommender_health(&self) -> HttpRequest {
        self.request(HttpMethod::Get, &["recommendations", "health"], &[])
    }

    pub fn parse_recommendations(&self, response: HttpResponse) -> Result<Value, ApiError> {
        parse_data(&response)
    }

    pub fn parse_similar_users(&self, response: HttpResponse) -> Result<Value, ApiError> {
        parse_data(&response)
    }

    pub fn parse_algorithm_info(&self, response: HttpResponse) -> Result<Value, ApiError> {
        parse_data(&response)
    }

    /// An unhealthy recommender is reported by the backend as a rejected
    /// envelope, which surfaces as `ApiError::Rejected`.
    pub fn parse_recommender_health(&self, response: HttpResponse) -> Result<bool, ApiError> {
        parse_data(&response)
    }
}
