//! Domain DTOs for the movie recommendation API.
//!
//! # Design
//! These types mirror the backend's JSON (camelCase keys) but are defined
//! independently from the mock-server crate; integration tests catch schema
//! drift. Most backend fields are nullable, so reads are lenient: absent
//! keys become `None` and unknown keys are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A movie as returned by the recommendation endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub info_id: Option<i64>,
    #[serde(default)]
    pub movie_name: Option<String>,
    #[serde(default, rename = "type")]
    pub movie_type: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub movie_rating: Option<f64>,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub actor_string: Option<String>,
    #[serde(default)]
    pub director_string: Option<String>,
    #[serde(default)]
    pub characters: Option<String>,
}

impl Movie {
    /// Actors, split on the backend's `|` separator.
    pub fn actors(&self) -> Vec<&str> {
        split_names(self.actor_string.as_deref())
    }

    /// Directors, split on the backend's `|` separator.
    pub fn directors(&self) -> Vec<&str> {
        split_names(self.director_string.as_deref())
    }
}

fn split_names(raw: Option<&str>) -> Vec<&str> {
    raw.map(|s| s.split('|').map(str::trim).filter(|n| !n.is_empty()).collect())
        .unwrap_or_default()
}

/// A user comment on a movie.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub add_time: Option<String>,
    #[serde(default)]
    pub movie_id: Option<i64>,
}

/// Payload for `POST /comment`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub movie_id: i64,
    pub content: String,
    pub rating: i32,
    pub creator: String,
}

/// A registered user. The password is only present when the backend echoes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Payload for `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
}

/// Credentials for `POST /users/login`. Sent as query parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Free-text request handed to the intent parser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IntentQuery {
    pub user_input: String,
    pub user_id: String,
}

/// Structured intent produced by the intent parser, e.g.
/// `director_based` with `{"director": "..."}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendIntent {
    #[serde(default)]
    pub intent_type: Option<String>,
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

/// Filters for `/movie/recommend`. Sent as a query string on GET and as a
/// JSON body on POST; unset filters are omitted in both forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub movie_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl RecommendQuery {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_opt(&mut query, "intentType", self.intent_type.as_ref());
        push_opt(&mut query, "director", self.director.as_ref());
        push_opt(&mut query, "type", self.movie_type.as_ref());
        push_opt(&mut query, "minRating", self.min_rating.as_ref());
        push_opt(&mut query, "userId", self.user_id.as_ref());
        push_opt(&mut query, "limit", self.limit.as_ref());
        query
    }
}

/// Zero-based paging used by the listing endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 0, size: 20 }
    }
}

impl Page {
    pub fn to_query(self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ]
    }
}

/// Filters for `GET /movie/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieSearch {
    pub keyword: Option<String>,
    pub movie_type: Option<String>,
    pub director: Option<String>,
    pub actor: Option<String>,
    pub page: Page,
}

impl MovieSearch {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        push_opt(&mut query, "keyword", self.keyword.as_ref());
        push_opt(&mut query, "type", self.movie_type.as_ref());
        push_opt(&mut query, "director", self.director.as_ref());
        push_opt(&mut query, "actor", self.actor.as_ref());
        query.extend(self.page.to_query());
        query
    }
}

fn push_opt<V: ToString>(query: &mut Vec<(String, String)>, key: &str, value: Option<&V>) {
    if let Some(v) = value {
        query.push((key.to_string(), v.to_string()));
    }
}
