//! Domain DTOs for the book-recommendation API.
//!
//! # Design
//! These types mirror the backend's JSON (camelCase keys) but are defined
//! independently from the mock-server crate; integration tests catch schema
//! drift. Almost every field is optional because the backend serializes its
//! entities with nulls for unset columns.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Envelope code the backend uses for success.
pub const SUCCESS_CODE: i32 = 200;

/// Envelope wrapped around every backend response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// One page of results from a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: u64,
    pub current: u64,
    pub size: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub book_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url_s: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url_m: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url_l: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_id: Option<i64>,
    pub user_id: i64,
    pub book_id: String,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A user profile as returned by the backend.
///
/// The session store treats this record opaquely. Fields it does not know
/// about, and known fields whose JSON has an unexpected type, are kept in
/// `extra` so the record survives a storage round-trip unchanged.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for User {
    /// Accepts any JSON object. A known field holding a value of another
    /// type stays in `extra` under its original key.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::<String, Value>::deserialize(deserializer)?;
        Ok(User {
            user_id: take(&mut extra, "userId"),
            username: take(&mut extra, "username"),
            email: take(&mut extra, "email"),
            nickname: take(&mut extra, "nickname"),
            location: take(&mut extra, "location"),
            age: take(&mut extra, "age"),
            age_group: take(&mut extra, "ageGroup"),
            country: take(&mut extra, "country"),
            avatar_url: take(&mut extra, "avatarUrl"),
            status: take(&mut extra, "status"),
            created_at: take(&mut extra, "createdAt"),
            updated_at: take(&mut extra, "updatedAt"),
            last_login_at: take(&mut extra, "lastLoginAt"),
            extra,
        })
    }
}

/// Remove `key` from `map` as a `T`. Nulls are dropped; values that do not
/// fit `T` are put back.
fn take<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = map.remove(key)?;
    if value.is_null() {
        return None;
    }
    let parsed = T::deserialize(&value);
    match parsed {
        Ok(typed) => Some(typed),
        Err(_) => {
            let _ = map.insert(key.to_string(), value);
            None
        }
    }
}

/// Truthiness of a JSON value, as a JavaScript `if` would judge it.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl User {
    /// True when any of `location`, `age` or `country` is falsy: missing,
    /// empty or zero. Untyped values kept in `extra` are judged by JSON
    /// truthiness.
    pub fn is_incomplete(&self) -> bool {
        let raw = |key: &str| self.extra.get(key).map_or(false, truthy);
        let text = |field: &Option<String>, key: &str| match field {
            Some(value) => !value.is_empty(),
            None => raw(key),
        };
        let age = match self.age {
            Some(age) => age != 0,
            None => raw("age"),
        };
        !(text(&self.location, "location") && age && text(&self.country, "country"))
    }

    /// The name to greet the user with: nickname, then username.
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.username.as_deref())
            .unwrap_or("")
    }
}

/// Payload of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResult {
    pub user: User,
    pub token: String,
}

/// Editable profile fields. Only the fields that are `Some` are sent and
/// applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ProfileUpdate {
    /// Copy every present field onto `user`, replacing any untyped value
    /// kept under the same key.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(nickname) = &self.nickname {
            user.nickname = Some(nickname.clone());
            let _ = user.extra.remove("nickname");
        }
        if let Some(email) = &self.email {
            user.email = Some(email.clone());
            let _ = user.extra.remove("email");
        }
        if let Some(location) = &self.location {
            user.location = Some(location.clone());
            let _ = user.extra.remove("location");
        }
        if let Some(age) = self.age {
            user.age = Some(i64::from(age));
            let _ = user.extra.remove("age");
        }
        if let Some(country) = &self.country {
            user.country = Some(country.clone());
            let _ = user.extra.remove("country");
        }
    }
}
