//! Client for the movie recommendation backend.
//!
//! # Overview
//! `MovieClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). `MovieApi` wraps it
//! in a two-stage pipeline around a `Transport`: the request interceptor
//! forces a JSON content type, the response interceptor unwraps the backend
//! envelope `{code, msg, data}` and rejects any `code` other than 200.
//!
//! # Design
//! - `MovieClient` is stateless; it holds only `base_url`.
//! - Configuration is built once (`ClientConfig::from_env`) and passed in.
//! - Successful calls return the whole `Envelope`, not just `data`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod interceptor;
pub mod transport;
pub mod types;

pub use api::MovieApi;
pub use client::MovieClient;
pub use config::{ClientConfig, ProxyRule};
pub use envelope::{Envelope, ResultCode, SUCCESS_CODE};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Comment, IntentQuery, LoginRequest, Movie, MovieSearch, NewComment, Page, RecommendIntent,
    RecommendQuery, RegisterUser, User,
};
