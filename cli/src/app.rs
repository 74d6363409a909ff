//! Dispatches CLI commands: build with the core client, execute, parse, and
//! feed login and profile results into the session.

use anyhow::{anyhow, bail, Result};
use bookrec_core::{
    BookRecClient, HttpRequest, HttpResponse, ProfileUpdate, SessionStore, Storage, Strategy,
};
use serde::Serialize;
use serde_json::Value;

use crate::args::{Command, ProfileArgs};
use crate::transport::HttpTransport;

/// What a command produced.
#[derive(Debug, PartialEq)]
pub(crate) enum Output {
    Json(Value),
    Message(String),
}

impl Output {
    fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Output::Json(serde_json::to_value(value)?))
    }
}

pub(crate) struct App<S> {
    client: BookRecClient,
    transport: HttpTransport,
    session: SessionStore<S>,
}

impl<S: Storage> App<S> {
    pub(crate) fn new(client: BookRecClient, transport: HttpTransport, session: SessionStore<S>) -> Self {
        Self {
            client,
            transport,
            session,
        }
    }

    /// Execute with the session token attached, if there is one.
    fn send(&self, req: HttpRequest) -> Result<HttpResponse> {
        self.transport.execute(req.with_bearer(self.session.token()))
    }

    fn require_user(&self) -> Result<i64> {
        if !self.session.is_logged_in() {
            bail!("not logged in; run `bookrec login` first");
        }
        self.session
            .user_id()
            .ok_or_else(|| anyhow!("the stored profile has no user id; log in again"))
    }

    pub(crate) fn run(&mut self, command: Command) -> Result<Output> {
        let client = &self.client;
        match command {
            Command::Register {
                username,
                password,
                email,
            } => {
                let req = client.build_register(&username, &password, email.as_deref());
                let user = client.parse_register(self.send(req)?)?;
                Output::json(&user)
            }
            Command::Login { username, password } => {
                let req = client.build_login(&username, &password);
                let login = client.parse_login(self.send(req)?)?;
                self.session.apply_login(login)?;
                let name = self
                    .session
                    .user_info()
                    .map(|user| user.display_name().to_string())
                    .unwrap_or(username);
                let mut message = format!("Logged in as {name}");
                if self.session.is_profile_incomplete() {
                    message.push_str(
                        "\nYour profile is incomplete; set location, age and country with `bookrec profile`",
                    );
                }
                Ok(Output::Message(message))
            }
            Command::Logout => {
                self.session.logout()?;
                Ok(Output::Message("Logged out".to_string()))
            }
            Command::Whoami => match self.session.user_info() {
                Some(user) if self.session.is_logged_in() => Output::json(user),
                _ => Ok(Output::Message("Not logged in".to_string())),
            },
            Command::Profile(args) => {
                let user_id = self.require_user()?;
                let update = profile_update(args);
                if update == ProfileUpdate::default() {
                    bail!("nothing to update; pass at least one field");
                }
                let req = client.build_update_user(user_id, &update);
                let message = client.parse_update_user(self.send(req)?)?;
                self.session.apply_profile_update(&update)?;
                Ok(Output::Message(message))
            }
            Command::Books {
                page,
                size,
                keyword,
            } => {
                let req = client.build_list_books(page, size, keyword.as_deref());
                Output::json(&client.parse_list_books(self.send(req)?)?)
            }
            Command::Book { book_id } => {
                let req = client.build_book_detail(&book_id);
                Output::json(&client.parse_book_detail(self.send(req)?)?)
            }
            Command::Popular { limit } => {
                let req = client.build_popular_books(limit);
                Output::json(&client.parse_popular_books(self.send(req)?)?)
            }
            Command::Latest { limit } => {
                let req = client.build_latest_books(limit);
                Output::json(&client.parse_latest_books(self.send(req)?)?)
            }
            Command::Similar { book_id, limit } => {
                let user_id = self.session.user_id().filter(|_| self.session.is_logged_in());
                let req = client.build_similar_books(&book_id, user_id, limit);
                Ok(Output::Json(client.parse_similar_books(self.send(req)?)?))
            }
            Command::BookRatings { book_id } => {
                let req = client.build_book_ratings(&book_id);
                Output::json(&client.parse_book_ratings(self.send(req)?)?)
            }
            Command::Rate { book_id, rating } => {
                let user_id = self.require_user()?;
                let req = client.build_rate_book(user_id, &book_id, rating);
                Ok(Output::Message(client.parse_rate_book(self.send(req)?)?))
            }
            Command::MyRating { book_id } => {
                let user_id = self.require_user()?;
                let req = client.build_user_book_rating(user_id, &book_id);
                match client.parse_user_book_rating(self.send(req)?)? {
                    Some(rating) => Output::json(&rating),
                    None => Ok(Output::Message(format!("You have not rated {book_id}"))),
                }
            }
            Command::MyRatings => {
                let user_id = self.require_user()?;
                let req = client.build_user_ratings(user_id);
                Output::json(&client.parse_user_ratings(self.send(req)?)?)
            }
            Command::Recommend {
                item_based,
                top_n,
                min_rating,
            } => {
                let user_id = self.require_user()?;
                let strategy = if item_based {
                    Strategy::ItemBased
                } else {
                    Strategy::UserBased
                };
                let req = client.build_recommendations(strategy, user_id, top_n, min_rating);
                Ok(Output::Json(client.parse_recommendations(self.send(req)?)?))
            }
            Command::SimilarUsers { top_k } => {
                let user_id = self.require_user()?;
                let req = client.build_similar_users(user_id, top_k);
                Ok(Output::Json(client.parse_similar_users(self.send(req)?)?))
            }
            Command::Algorithm => {
                let req = client.build_algorithm_info();
                Ok(Output::Json(client.parse_algorithm_info(self.send(req)?)?))
            }
            Command::Health => {
                let req = client.build_recommender_health();
                let healthy = client.parse_recommender_health(self.send(req)?)?;
                Ok(Output::Message(
                    if healthy { "Recommender is up" } else { "Recommender is down" }.to_string(),
                ))
            }
        }
    }

    #[cfg(test)]
    fn session(&self) -> &SessionStore<S> {
        &self.session
    }
}

fn profile_update(args: ProfileArgs) -> ProfileUpdate {
    ProfileUpdate {
        nickname: args.nickname,
        email: args.email,
        location: args.location,
        age: args.age,
        country: args.country,
    }
}
