//! One call per backend endpoint, run through the interceptor pipeline.
//!
//! Every method does the same four steps: build the request with
//! `MovieClient`, apply `intercept_request`, execute it on the transport and
//! apply `intercept_response`. Transport errors are logged and returned
//! untouched inside `ApiError::Transport`, except an `ApiError` a transport
//! raised itself (an unresolvable URL), which comes back as that error.
//!
//! `MovieApi` holds no per-call state, so one instance can be shared by
//! reference (or `Arc`) between threads. Completion order of concurrent
//! calls is whatever the transport produces.

use serde::de::DeserializeOwned;
use tracing::error;

use crate::client::MovieClient;
use crate::config::ClientConfig;
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::interceptor::{intercept_request, intercept_response};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    Comment, IntentQuery, LoginRequest, Movie, MovieSearch, NewComment, Page, RecommendIntent,
    RecommendQuery, RegisterUser, User,
};

pub struct MovieApi<T> {
    client: MovieClient,
    transport: T,
}

impl MovieApi<UreqTransport> {
    /// Build the shared client from configuration with the blocking transport.
    ///
    /// Fails with `ApiError::Config` when `base_url` is relative and no proxy
    /// rule resolves it.
    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        config.resolve_url(&config.base_url)?;
        let client = MovieClient::new(&config.base_url);
        Ok(Self::new(client, UreqTransport::new(config)))
    }
}

impl<T: Transport> MovieApi<T> {
    pub fn new(client: MovieClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &MovieClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run an already built request through the pipeline.
    pub fn send<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<Envelope<R>, ApiError> {
        let request = intercept_request(request);
        let response = self
            .transport
            .execute(&request)
            .map_err(|e| match e.downcast::<ApiError>() {
                Ok(err) => *err,
                Err(e) => {
                    error!(method = %request.method, path = %request.path, error = %e, "transport error");
                    ApiError::Transport(e)
                }
            })?;
        intercept_response(response)
    }

    pub fn parse_user_intent(&self, input: &IntentQuery) -> Result<Envelope<RecommendIntent>, ApiError> {
        self.send(self.client.build_parse_user_intent(input)?)
    }

    pub fn get_recommend_movies(&self, query: &RecommendQuery) -> Result<Envelope<Vec<Movie>>, ApiError> {
        self.send(self.client.build_get_recommend_movies(query))
    }

    pub fn get_recommend_movies_post(
        &self,
        query: &RecommendQuery,
    ) -> Result<Envelope<Vec<Movie>>, ApiError> {
        self.send(self.client.build_get_recommend_movies_post(query)?)
    }

    pub fn get_movie_detail(&self, movie_id: i64) -> Result<Envelope<Movie>, ApiError> {
        self.send(self.client.build_get_movie_detail(movie_id))
    }

    pub fn list_movies(&self, page: Page) -> Result<Envelope<Vec<Movie>>, ApiError> {
        self.send(self.client.build_list_movies(page))
    }

    pub fn search_movies(&self, search: &MovieSearch) -> Result<Envelope<Vec<Movie>>, ApiError> {
        self.send(self.client.build_search_movies(search))
    }

    pub fn get_movies_by_type(&self, movie_type: &str, page: Page) -> Result<Envelope<Vec<Movie>>, ApiError> {
        self.send(self.client.build_get_movies_by_type(movie_type, page))
    }

    pub fn get_collaborative_filtering_recommend(
        &self,
        user_id: i64,
    ) -> Result<Envelope<Vec<Movie>>, ApiError> {
        self.send(self.client.build_get_collaborative_filtering_recommend(user_id))
    }

    pub fn get_default_collaborative_filtering_recommend(&self) -> Result<Envelope<Vec<Movie>>, ApiError> {
        self.send(self.client.build_get_default_collaborative_filtering_recommend())
    }

    pub fn get_all_comment_creators(&self) -> Result<Envelope<Vec<String>>, ApiError> {
        self.send(self.client.build_get_all_comment_creators())
    }

    pub fn get_movie_comments(&self, movie_id: i64) -> Result<Envelope<Vec<Comment>>, ApiError> {
        self.send(self.client.build_get_movie_comments(movie_id))
    }

    pub fn get_user_comments(&self, user_id: &str) -> Result<Envelope<Vec<Comment>>, ApiError> {
        self.send(self.client.build_get_user_comments(user_id))
    }

    pub fn add_comment(&self, comment: &NewComment) -> Result<Envelope<String>, ApiError> {
        self.send(self.client.build_add_comment(comment)?)
    }

    pub fn delete_comment(&self, comment_id: i64) -> Result<Envelope<String>, ApiError> {
        self.send(self.client.build_delete_comment(comment_id))
    }

    pub fn register_user(&self, user: &RegisterUser) -> Result<Envelope<User>, ApiError> {
        self.send(self.client.build_register_user(user)?)
    }

    pub fn login_user(&self, login: &LoginRequest) -> Result<Envelope<User>, ApiError> {
        self.send(self.client.build_login_user(login))
    }

    /// `data` is `true` when the name is already taken.
    pub fn check_username(&self, username: &str) -> Result<Envelope<bool>, ApiError> {
        self.send(self.client.build_check_username(username))
    }

    pub fn get_user(&self, user_id: i64) -> Result<Envelope<User>, ApiError> {
        self.send(self.client.build_get_user(user_id))
    }

    pub fn update_password(&self, user_id: i64, new_password: &str) -> Result<Envelope<bool>, ApiError> {
        self.send(self.client.build_update_password(user_id, new_password))
    }
}
