//! Error types for the movie API client.
//!
//! # Design
//! Transport failures are carried unchanged so callers can downcast to the
//! concrete error their `Transport` produced. A non-2xx HTTP status is
//! reported separately from an envelope whose `code` is not 200: the first
//! never reached the backend's result handling, the second did.

use thiserror::Error;

/// Error produced by a `Transport` implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Message used when a rejected envelope carries no `msg`.
pub const FALLBACK_MESSAGE: &str = "request failed";

/// Errors returned by `MovieApi` calls and the response interceptor.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The network call itself failed (connect, timeout, I/O).
    #[error(transparent)]
    Transport(TransportError),

    /// The server answered with a non-2xx HTTP status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The body's `code` is not 200, or it has no integer `code` at all.
    #[error("{msg}")]
    Rejected { code: Option<i64>, msg: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Envelope code of a rejected call, if the backend produced one.
    pub fn code(&self) -> Option<i64> {
        match self {
            ApiError::Rejected { code, .. } => *code,
            _ => None,
        }
    }
}
