//! Stateless HTTP request builder for the movie recommendation API.
//!
//! # Design
//! `MovieClient` holds only a `base_url` and carries no mutable state between
//! calls. Each endpoint has a `build_*` method that places its arguments in
//! the path, the query string or a JSON body, exactly as the backend expects.
//! `parse` hands a response to the response interceptor. The caller (or
//! `MovieApi`) executes the HTTP round-trip in between.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::interceptor::intercept_response;
use crate::types::{
    IntentQuery, LoginRequest, MovieSearch, NewComment, Page, RecommendQuery, RegisterUser,
};

/// Synchronous, stateless request builder for the movie API.
#[derive(Debug, Clone)]
pub struct MovieClient {
    base_url: String,
}

impl MovieClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- intent ---

    pub fn build_parse_user_intent(&self, input: &IntentQuery) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/dify/parseIntent", input)
    }

    // --- movies ---

    pub fn build_get_recommend_movies(&self, query: &RecommendQuery) -> HttpRequest {
        let mut req = self.request(HttpMethod::Get, "/movie/recommend");
        req.query = query.to_query();
        req
    }

    pub fn build_get_recommend_movies_post(
        &self,
        query: &RecommendQuery,
    ) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/movie/recommend", query)
    }

    pub fn build_get_movie_detail(&self, movie_id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/movie/by-movie-id/{movie_id}"))
    }

    pub fn build_list_movies(&self, page: Page) -> HttpRequest {
        let mut req = self.request(HttpMethod::Get, "/movie/list");
        req.query = page.to_query();
        req
    }

    pub fn build_search_movies(&self, search: &MovieSearch) -> HttpRequest {
        let mut req = self.request(HttpMethod::Get, "/movie/search");
        req.query = search.to_query();
        req
    }

    pub fn build_get_movies_by_type(&self, movie_type: &str, page: Page) -> HttpRequest {
        let mut req = self.request(
            HttpMethod::Get,
            &format!("/movie/by-type/{}", urlencoding::encode(movie_type)),
        );
        req.query = page.to_query();
        req
    }

    // --- recommendation ---

    pub fn build_get_collaborative_filtering_recommend(&self, user_id: i64) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            &format!("/recommendation/collaborative-filtering/{user_id}"),
        )
    }

    pub fn build_get_default_collaborative_filtering_recommend(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/recommendation/collaborative-filtering")
    }

    // --- comments ---

    pub fn build_get_all_comment_creators(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/comment/creators")
    }

    pub fn build_get_movie_comments(&self, movie_id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/comment/movie/{movie_id}"))
    }

    pub fn build_get_user_comments(&self, user_id: &str) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            &format!("/comment/user/{}", urlencoding::encode(user_id)),
        )
    }

    pub fn build_add_comment(&self, comment: &NewComment) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/comment", comment)
    }

    pub fn build_delete_comment(&self, comment_id: i64) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/comment/{comment_id}"))
    }

    // --- users ---

    pub fn build_register_user(&self, user: &RegisterUser) -> Result<HttpRequest, ApiError> {
        self.json(HttpMethod::Post, "/users", user)
    }

    /// Credentials travel in the query string; the body stays empty.
    pub fn build_login_user(&self, login: &LoginRequest) -> HttpRequest {
        let mut req = self.request(HttpMethod::Post, "/users/login");
        req.query = vec![
            ("username".to_string(), login.username.clone()),
            ("password".to_string(), login.password.clone()),
        ];
        req
    }

    pub fn build_check_username(&self, username: &str) -> HttpRequest {
        self.request(
            HttpMethod::Get,
            &format!("/users/check-username/{}", urlencoding::encode(username)),
        )
    }

    pub fn build_get_user(&self, user_id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/users/{user_id}"))
    }

    pub fn build_update_password(&self, user_id: i64, new_password: &str) -> HttpRequest {
        let mut req = self.request(HttpMethod::Put, &format!("/users/{user_id}/password"));
        req.query = vec![("newPassword".to_string(), new_password.to_string())];
        req
    }

    /// Decode any endpoint's response through the response interceptor.
    pub fn parse<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<Envelope<T>, ApiError> {
        intercept_response(response)
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}{path}", self.base_url))
    }

    fn json<B: Serialize>(&self, method: HttpMethod, path: &str, body: &B) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| {
            error!(path, error = %e, "request error");
            ApiError::Serialization(e.to_string())
        })?;
        let mut req = self.request(method, path);
        req.body = Some(body);
        Ok(req)
    }
}
