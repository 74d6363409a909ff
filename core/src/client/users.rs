//! `/users` endpoints.

use super::{parse_data, parse_message, BookRecClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{LoginResult, ProfileUpdate, Rating, User};

impl BookRecClient {
    pub fn build_register(&self, username: &str, password: &str, email: Option<&str>) -> HttpRequest {
        self.request(
            HttpMethod::Post,
            &["users", "register"],
            &[
                ("username", Some(username.to_string())),
                ("password", Some(password.to_string())),
                ("email", email.map(str::to_string)),
            ],
        )
    }

    pub fn build_login(&self, username: &str, password: &str) -> HttpRequest {
        self.request(
            HttpMethod::Post,
            &["users", "login"],
            &[
                ("username", Some(username.to_string())),
                ("password", Some(password.to_string())),
            ],
        )
    }

    pub fn build_user_info(&self, user_id: i64) -> HttpRequest {
        let user_id = user_id.to_string();
        self.request(HttpMethod::Get, &["users", &user_id], &[])
    }

    pub fn build_update_user(&self, user_id: i64, update: &ProfileUpdate) -> HttpRequest {
        let user_id = user_id.to_string();
        self.request(
            HttpMethod::Put,
            &["users", &user_id],
            &[
                ("nickname", update.nickname.clone()),
                ("email", update.email.clone()),
                ("location", update.location.clone()),
                ("age", update.age.map(|age| age.to_string())),
                ("country", update.country.clone()),
            ],
        )
    }

    pub fn build_user_rating_history(&self, user_id: i64) -> HttpRequest {
        let user_id = user_id.to_string();
        self.request(HttpMethod::Get, &["users", &user_id, "ratings"], &[])
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_data(&response)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginResult, ApiError> {
        parse_data(&response)
    }

    pub fn parse_user_info(&self, response: HttpResponse) -> Result<User, ApiError> {
        parse_data(&response)
    }

    pub fn parse_update_user(&self, response: HttpResponse) -> Result<String, ApiError> {
        parse_message(&response)
    }

    pub fn parse_user_rating_history(&self, response: HttpResponse) -> Result<Vec<Rating>, ApiError> {
        parse_data(&response)
    }
}
