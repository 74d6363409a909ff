//! The client-side session: who is logged in, and with which token.
//!
//! # Design
//! `SessionStore` is an explicitly constructed value, generic over the
//! [`Storage`] it writes through to. Both the profile and the token are
//! persisted under fixed keys and rehydrated together by [`SessionStore::load`].
//! Every mutation updates memory first and then storage; a failed write is
//! returned to the caller.
//!
//! `is_logged_in` is always derived from the two fields and never stored.

use std::fmt;

use crate::error::StorageError;
use crate::storage::Storage;
use crate::types::{LoginResult, ProfileUpdate, User};

/// Storage key holding the raw access token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the JSON-serialized profile.
pub const USER_KEY: &str = "user";

pub struct SessionStore<S> {
    storage: S,
    user: Option<User>,
    token: String,
}

/// Omits the storage, which holds the token too.
impl<S> fmt::Debug for SessionStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.token.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("SessionStore")
            .field("user", &self.user)
            .field("token", &token)
            .finish_non_exhaustive()
    }
}

impl<S: Storage> SessionStore<S> {
    /// Rehydrate a session from `storage`.
    ///
    /// Never fails: unreadable or malformed entries are logged and treated
    /// as absent.
    pub fn load(storage: S) -> Self {
        let token = match storage.get(TOKEN_KEY) {
            Ok(token) => token.unwrap_or_default(),
            Err(e) => {
                log::warn!("Unable to read the stored token: {}", e);
                String::new()
            }
        };

        let user = match storage.get(USER_KEY) {
            Ok(Some(raw)) => decode_user(&raw),
            Ok(None) => None,
            Err(e) => {
                log::warn!("Unable to read the stored user: {}", e);
                None
            }
        };

        log::debug!(
            "Loaded session (user: {}, token: {})",
            user.is_some(),
            !token.is_empty()
        );

        Self {
            storage,
            user,
            token,
        }
    }

    pub fn set_user(&mut self, user: User) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&user)?;
        self.user = Some(user);
        self.storage.set(USER_KEY, &encoded)
    }

    pub fn set_token<T: Into<String>>(&mut self, token: T) -> Result<(), StorageError> {
        self.token = token.into();
        self.storage.set(TOKEN_KEY, &self.token)
    }

    /// Store the user and token from a successful login.
    pub fn apply_login(&mut self, login: LoginResult) -> Result<(), StorageError> {
        log::info!("Logged in as {}", login.user.display_name());
        self.set_user(login.user)?;
        self.set_token(login.token)
    }

    /// Merge an accepted profile update into the stored user. Does nothing
    /// when nobody is logged in.
    pub fn apply_profile_update(&mut self, update: &ProfileUpdate) -> Result<(), StorageError> {
        let Some(mut user) = self.user.clone() else {
            return Ok(());
        };
        update.apply_to(&mut user);
        self.set_user(user)
    }

    /// Forget the user and token, both in memory and in storage.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        if self.is_logged_in() {
            log::info!("Logging out");
        }
        self.user = None;
        self.token.clear();
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)
    }

    pub fn user_info(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().and_then(|user| user.user_id)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some() && !self.token.is_empty()
    }

    /// True when a user is set and is missing any of location, age or
    /// country.
    pub fn is_profile_incomplete(&self) -> bool {
        self.user.as_ref().map_or(false, User::is_incomplete)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

fn decode_user(raw: &str) -> Option<User> {
    match serde_json::from_str::<Option<User>>(raw) {
        Ok(user) => user,
        Err(e) => {
            log::warn!("Ignoring malformed stored user: {}", e);
            None
        }
    }
}
