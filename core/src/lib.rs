//! Synchronous API client core for the book-recommendation service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and keeps the client-side
//! session (current user and access token) in sync with durable storage.
//!
//! # Design
//! - `BookRecClient` is stateless; it holds only the base URL.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `SessionStore` is constructed explicitly and generic over a `Storage`
//!   capability, so tests run against `MemoryStorage` and the host against
//!   `FileStorage`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod session;
pub mod storage;
pub mod types;

pub use client::recommendations::Strategy;
pub use client::BookRecClient;
pub use error::{ApiError, StorageError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::SessionStore;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use types::{ApiResponse, Book, LoginResult, Page, ProfileUpdate, Rating, User};
