use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

pub const SUCCESS: i64 = 200;
pub const DATA_NOT_FOUND: i64 = 404;
pub const SYSTEM_ERROR: i64 = 500;

/// Fallback user for the parameterless collaborative-filtering route.
pub const DEFAULT_USER_ID: i64 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    pub msg: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS,
            msg: "success".to_string(),
            data: Some(data),
            total: None,
        }
    }

    pub fn paged(data: T, total: usize) -> Self {
        Self {
            total: Some(total as i64),
            ..Self::success(data)
        }
    }

    pub fn error(code: i64, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
            total: None,
        }
    }
}

type Reply<T> = Json<Envelope<T>>;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub info_id: i64,
    pub movie_name: String,
    #[serde(rename = "type")]
    pub movie_type: String,
    pub region: String,
    pub movie_rating: f64,
    pub instruction: String,
    pub actor_string: String,
    pub director_string: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub rating: i32,
    pub content: String,
    pub creator: String,
    pub movie_id: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPassword {
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub movie_id: i64,
    pub content: String,
    pub rating: i32,
    pub creator: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentQuery {
    pub user_input: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendIntent {
    pub intent_type: String,
    pub params: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendFilter {
    pub director: Option<String>,
    #[serde(rename = "type")]
    pub movie_type: Option<String>,
    pub min_rating: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_size")]
    pub size: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    #[serde(rename = "type")]
    pub movie_type: Option<String>,
    pub director: Option<String>,
    pub actor: Option<String>,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_size() -> usize {
    20
}

#[derive(Debug)]
pub struct Backend {
    pub movies: Vec<Movie>,
    pub users: Vec<User>,
    pub comments: Vec<Comment>,
    next_user_id: i64,
    next_comment_id: i64,
}

impl Backend {
    pub fn seeded() -> Self {
        let movie = |info_id: i64, name: &str, ty: &str, rating: f64, directors: &str, actors: &str| Movie {
            id: info_id + 100,
            info_id,
            movie_name: name.to_string(),
            movie_type: ty.to_string(),
            region: "China".to_string(),
            movie_rating: rating,
            instruction: format!("{name}."),
            actor_string: actors.to_string(),
            director_string: directors.to_string(),
        };
        let movies = vec![
            movie(1, "Hero", "Action|Drama", 7.9, "Zhang Yimou", "Jet Li|Tony Leung"),
            movie(2, "Red Sorghum", "Drama", 8.3, "Zhang Yimou", "Gong Li|Jiang Wen"),
            movie(3, "Farewell My Concubine", "Drama", 9.6, "Chen Kaige", "Leslie Cheung|Gong Li"),
            movie(4, "Kung Fu Hustle", "Comedy|Action", 8.8, "Stephen Chow", "Stephen Chow|Yuen Qiu"),
            movie(5, "In the Mood for Love", "Romance", 8.7, "Wong Kar-wai", "Tony Leung|Maggie Cheung"),
        ];
        let user = |id: i64, name: &str| User {
            id,
            username: name.to_string(),
            password: format!("{name}-pw"),
        };
        let users = vec![user(1, "alice"), user(2, "bob")];
        let comment = |id: i64, movie_id: i64, creator: &str, rating: i32| Comment {
            id,
            rating,
            content: format!("{creator} on movie {movie_id}"),
            creator: creator.to_string(),
            movie_id,
        };
        let comments = vec![
            comment(1, 1, "alice", 4),
            comment(2, 3, "alice", 5),
            comment(3, 4, "bob", 5),
            comment(4, 1, "carol", 3),
        ];
        Self {
            movies,
            users,
            comments,
            next_user_id: 3,
            next_comment_id: 5,
        }
    }

    /// Highest-rated movies the user has not commented on yet.
    fn recommend_for(&self, user_id: i64) -> Option<Vec<Movie>> {
        let user = self.users.iter().find(|u| u.id == user_id)?;
        let seen: Vec<i64> = self
            .comments
            .iter()
            .filter(|c| c.creator == user.username)
            .map(|c| c.movie_id)
            .collect();
        let mut picks: Vec<Movie> = self
            .movies
            .iter()
            .filter(|m| !seen.contains(&m.info_id))
            .cloned()
            .collect();
        picks.sort_by(|a, b| b.movie_rating.total_cmp(&a.movie_rating));
        picks.truncate(3);
        Some(picks)
    }
}

pub type Db = Arc<RwLock<Backend>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Backend::seeded()));
    Router::new()
        .route("/dify/parseIntent", post(parse_intent))
        .route("/movie/recommend", get(recommend_get).post(recommend_post))
        .route("/movie/by-movie-id/{movie_id}", get(movie_detail))
        .route("/movie/list", get(list_movies))
        .route("/movie/search", get(search_movies))
        .route("/movie/by-type/{movie_type}", get(movies_by_type))
        .route("/recommendation/collaborative-filtering", get(collaborative_default))
        .route("/recommendation/collaborative-filtering/{user_id}", get(collaborative))
        .route("/comment", post(add_comment))
        .route("/comment/creators", get(comment_creators))
        .route("/comment/movie/{movie_id}", get(movie_comments))
        .route("/comment/user/{user_id}", get(user_comments))
        .route("/comment/{comment_id}", delete(delete_comment))
        .route("/users", post(register_user))
        .route("/users/login", post(login))
        .route("/users/check-username/{username}", get(check_username))
        .route("/users/{user_id}", get(get_user))
        .route("/users/{user_id}/password", put(update_password))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn parse_intent(State(db): State<Db>, Json(input): Json<IntentQuery>) -> Reply<RecommendIntent> {
    let backend = db.read().await;
    let text = input.user_input.to_lowercase();
    let mut params = serde_json::Map::new();

    let director = backend
        .movies
        .iter()
        .flat_map(|m| m.director_string.split('|'))
        .find(|d| text.contains(&d.to_lowercase()));
    let genre = backend
        .movies
        .iter()
        .flat_map(|m| m.movie_type.split('|'))
        .find(|t| text.contains(&t.to_lowercase()));

    let intent_type = if let Some(director) = director {
        params.insert("director".into(), director.into());
        "director_based"
    } else if let Some(genre) = genre {
        params.insert("type".into(), genre.into());
        "type_based"
    } else {
        params.insert("min_rating".into(), 8.into());
        "rating_based"
    };
    info!(user_id = %input.user_id, intent_type, "parsed intent");
    Json(Envelope::success(RecommendIntent {
        intent_type: intent_type.to_string(),
        params,
    }))
}

fn recommend(backend: &Backend, filter: &RecommendFilter) -> Vec<Movie> {
    let mut picks: Vec<Movie> = backend
        .movies
        .iter()
        .filter(|m| {
            filter
                .director
                .as_ref()
                .map_or(true, |d| m.director_string.split('|').any(|x| x == d.as_str()))
        })
        .filter(|m| {
            filter
                .movie_type
                .as_ref()
                .map_or(true, |t| m.movie_type.split('|').any(|x| x == t.as_str()))
        })
        .filter(|m| filter.min_rating.map_or(true, |r| m.movie_rating >= r))
        .cloned()
        .collect();
    picks.sort_by(|a, b| b.movie_rating.total_cmp(&a.movie_rating));
    if let Some(limit) = filter.limit {
        picks.truncate(limit);
    }
    picks
}

async fn recommend_get(State(db): State<Db>, Query(filter): Query<RecommendFilter>) -> Reply<Vec<Movie>> {
    Json(Envelope::success(recommend(&*db.read().await, &filter)))
}

async fn recommend_post(State(db): State<Db>, Json(filter): Json<RecommendFilter>) -> Reply<Vec<Movie>> {
    Json(Envelope::success(recommend(&*db.read().await, &filter)))
}

async fn movie_detail(State(db): State<Db>, Path(movie_id): Path<i64>) -> Reply<Movie> {
    let backend = db.read().await;
    Json(match backend.movies.iter().find(|m| m.info_id == movie_id) {
        Some(movie) => Envelope::success(movie.clone()),
        None => Envelope::error(DATA_NOT_FOUND, "movie not found"),
    })
}

fn page_of(movies: Vec<Movie>, page: usize, size: usize) -> Envelope<Vec<Movie>> {
    let total = movies.len();
    let items = movies.into_iter().skip(page.saturating_mul(size)).take(size).collect();
    Envelope::paged(items, total)
}

async fn list_movies(State(db): State<Db>, Query(q): Query<PageQuery>) -> Reply<Vec<Movie>> {
    let backend = db.read().await;
    Json(page_of(backend.movies.clone(), q.page, q.size))
}

async fn search_movies(State(db): State<Db>, Query(q): Query<SearchQuery>) -> Reply<Vec<Movie>> {
    let backend = db.read().await;
    let contains = |field: &str, needle: &Option<String>| {
        needle
            .as_ref()
            .map_or(true, |n| field.to_lowercase().contains(&n.to_lowercase()))
    };
    let hits = backend
        .movies
        .iter()
        .filter(|m| contains(&m.movie_name, &q.keyword))
        .filter(|m| contains(&m.movie_type, &q.movie_type))
        .filter(|m| contains(&m.director_string, &q.director))
        .filter(|m| contains(&m.actor_string, &q.actor))
        .cloned()
        .collect();
    Json(page_of(hits, q.page, q.size))
}

async fn movies_by_type(
    State(db): State<Db>,
    Path(movie_type): Path<String>,
    Query(q): Query<PageQuery>,
) -> Reply<Vec<Movie>> {
    let backend = db.read().await;
    let hits = backend
        .movies
        .iter()
        .filter(|m| m.movie_type.split('|').any(|t| t == movie_type))
        .cloned()
        .collect();
    Json(page_of(hits, q.page, q.size))
}

async fn collaborative(State(db): State<Db>, Path(user_id): Path<i64>) -> Reply<Vec<Movie>> {
    let backend = db.read().await;
    Json(match backend.recommend_for(user_id) {
        Some(picks) => Envelope::success(picks),
        None => {
            warn!(user_id, "collaborative filtering for unknown user");
            Envelope::error(SYSTEM_ERROR, "collaborative filtering failed")
        }
    })
}

async fn collaborative_default(state: State<Db>) -> Reply<Vec<Movie>> {
    collaborative(state, Path(DEFAULT_USER_ID)).await
}

async fn comment_creators(State(db): State<Db>) -> Reply<Vec<String>> {
    let backend = db.read().await;
    let mut creators: Vec<String> = backend.comments.iter().map(|c| c.creator.clone()).collect();
    creators.sort();
    creators.dedup();
    Json(Envelope::success(creators))
}

async fn movie_comments(State(db): State<Db>, Path(movie_id): Path<i64>) -> Reply<Vec<Comment>> {
    let backend = db.read().await;
    let comments = backend
        .comments
        .iter()
        .filter(|c| c.movie_id == movie_id)
        .cloned()
        .collect();
    Json(Envelope::success(comments))
}

async fn user_comments(State(db): State<Db>, Path(user_id): Path<String>) -> Reply<Vec<Comment>> {
    let backend = db.read().await;
    // Comments are keyed by creator name; numeric ids are resolved first.
    let creator = user_id
        .parse::<i64>()
        .ok()
        .and_then(|id| backend.users.iter().find(|u| u.id == id))
        .map(|u| u.username.clone())
        .unwrap_or(user_id);
    let comments = backend
        .comments
        .iter()
        .filter(|c| c.creator == creator)
        .cloned()
        .collect();
    Json(Envelope::success(comments))
}

async fn add_comment(State(db): State<Db>, Json(input): Json<NewComment>) -> Reply<String> {
    let mut backend = db.write().await;
    if !backend.movies.iter().any(|m| m.info_id == input.movie_id) {
        return Json(Envelope::error(SYSTEM_ERROR, "failed to add comment"));
    }
    let id = backend.next_comment_id;
    backend.next_comment_id += 1;
    backend.comments.push(Comment {
        id,
        rating: input.rating,
        content: input.content,
        creator: input.creator,
        movie_id: input.movie_id,
    });
    Json(Envelope::success("comment added".to_string()))
}

async fn delete_comment(State(db): State<Db>, Path(comment_id): Path<i64>) -> Reply<String> {
    let mut backend = db.write().await;
    let before = backend.comments.len();
    backend.comments.retain(|c| c.id != comment_id);
    Json(if backend.comments.len() < before {
        Envelope::success("comment deleted".to_string())
    } else {
        Envelope::error(SYSTEM_ERROR, "failed to delete comment")
    })
}

async fn register_user(State(db): State<Db>, Json(input): Json<RegisterUser>) -> Reply<User> {
    let mut backend = db.write().await;
    if input.username.trim().is_empty() {
        return Json(Envelope::error(SYSTEM_ERROR, "registration failed: username is empty"));
    }
    if backend.users.iter().any(|u| u.username == input.username) {
        return Json(Envelope::error(SYSTEM_ERROR, "registration failed: username taken"));
    }
    let user = User {
        id: backend.next_user_id,
        username: input.username,
        password: input.password,
    };
    backend.next_user_id += 1;
    backend.users.push(user.clone());
    info!(user_id = user.id, "registered user");
    Json(Envelope::success(user))
}

async fn login(State(db): State<Db>, Query(creds): Query<Credentials>) -> Reply<User> {
    let backend = db.read().await;
    Json(
        match backend
            .users
            .iter()
            .find(|u| u.username == creds.username && u.password == creds.password)
        {
            Some(user) => Envelope::success(user.clone()),
            None => Envelope::error(SYSTEM_ERROR, "invalid username or password"),
        },
    )
}

async fn check_username(State(db): State<Db>, Path(username): Path<String>) -> Reply<bool> {
    let backend = db.read().await;
    Json(Envelope::success(backend.users.iter().any(|u| u.username == username)))
}

async fn get_user(State(db): State<Db>, Path(user_id): Path<i64>) -> Reply<User> {
    let backend = db.read().await;
    Json(match backend.users.iter().find(|u| u.id == user_id) {
        Some(user) => Envelope::success(user.clone()),
        None => Envelope::error(SYSTEM_ERROR, "user not found"),
    })
}

async fn update_password(
    State(db): State<Db>,
    Path(user_id): Path<i64>,
    Query(input): Query<NewPassword>,
) -> Reply<bool> {
    let mut backend = db.write().await;
    Json(match backend.users.iter_mut().find(|u| u.id == user_id) {
        Some(user) => {
            user.password = input.new_password;
            Envelope::success(true)
        }
        None => Envelope::error(SYSTEM_ERROR, "failed to update password"),
    })
}
