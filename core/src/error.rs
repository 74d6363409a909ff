//! Error types for the book-recommendation client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." The backend also reports application failures inside a 200
//! response (`code != 200` in the envelope); those surface as `Rejected`
//! with the server's message. Nothing here is retried.

use std::io;

use thiserror::Error;

/// Errors returned by `BookRecClient` parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The envelope reported a failure code.
    #[error("rejected by server ({code}): {message}")]
    Rejected { code: i32, message: String },

    /// The envelope reported success but carried no `data`.
    #[error("response carried no data")]
    MissingData,

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

/// Errors raised by a [`Storage`](crate::storage::Storage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    #[error("could not encode value for storage: {0}")]
    Encoding(#[from] serde_json::Error),
}
