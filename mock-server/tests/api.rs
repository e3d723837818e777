use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Comment, Envelope, Movie, RecommendIntent, User};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- movies ---

#[tokio::test]
async fn movie_detail_found() {
    let resp = app().oneshot(get("/movie/by-movie-id/3")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let env: Envelope<Movie> = body_json(resp).await;
    assert_eq!(env.code, 200);
    assert_eq!(env.data.unwrap().movie_name, "Farewell My Concubine");
}

#[tokio::test]
async fn movie_detail_missing_is_enveloped_404() {
    let resp = app().oneshot(get("/movie/by-movie-id/999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let env: Envelope<Movie> = body_json(resp).await;
    assert_eq!(env.code, 404);
    assert_eq!(env.msg, "movie not found");
    assert!(env.data.is_none());
}

#[tokio::test]
async fn movie_detail_bad_id_returns_400() {
    let resp = app().oneshot(get("/movie/by-movie-id/abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recommend_get_reads_query() {
    let resp = app()
        .oneshot(get("/movie/recommend?type=Drama&minRating=9"))
        .await
        .unwrap();
    let env: Envelope<Vec<Movie>> = body_json(resp).await;
    let names: Vec<String> = env.data.unwrap().into_iter().map(|m| m.movie_name).collect();
    assert_eq!(names, vec!["Farewell My Concubine"]);
}

#[tokio::test]
async fn recommend_post_reads_body() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/movie/recommend",
            r#"{"director":"Zhang Yimou","limit":1}"#,
        ))
        .await
        .unwrap();
    let env: Envelope<Vec<Movie>> = body_json(resp).await;
    let movies = env.data.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].movie_name, "Red Sorghum");
}

#[tokio::test]
async fn list_movies_is_paged() {
    let resp = app().oneshot(get("/movie/list?page=2&size=2")).await.unwrap();
    let env: Envelope<Vec<Movie>> = body_json(resp).await;
    assert_eq!(env.total, Some(5));
    assert_eq!(env.data.unwrap().len(), 1);
}

#[tokio::test]
async fn huge_page_is_empty_not_a_crash() {
    let resp = app()
        .oneshot(get("/movie/list?page=18446744073709551615&size=20"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let env: Envelope<Vec<Movie>> = body_json(resp).await;
    assert_eq!(env.code, 200);
    assert_eq!(env.total, Some(5));
    assert!(env.data.unwrap().is_empty());

    let resp = app()
        .oneshot(get("/movie/by-type/Action?page=2&size=9223372036854775807"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let env: Envelope<Vec<Movie>> = body_json(resp).await;
    assert_eq!(env.total, Some(2));
    assert!(env.data.unwrap().is_empty());
}

#[tokio::test]
async fn search_matches_actor_case_insensitively() {
    let resp = app().oneshot(get("/movie/search?actor=gong%20li")).await.unwrap();
    let env: Envelope<Vec<Movie>> = body_json(resp).await;
    assert_eq!(env.total, Some(2));
}

#[tokio::test]
async fn movies_by_type_splits_genres() {
    let resp = app().oneshot(get("/movie/by-type/Action")).await.unwrap();
    let env: Envelope<Vec<Movie>> = body_json(resp).await;
    let ids: Vec<i64> = env.data.unwrap().iter().map(|m| m.info_id).collect();
    assert_eq!(ids, vec![1, 4]);
}

// --- recommendation ---

#[tokio::test]
async fn collaborative_default_uses_first_user() {
    let default: Envelope<Vec<Movie>> = body_json(
        app()
            .oneshot(get("/recommendation/collaborative-filtering"))
            .await
            .unwrap(),
    )
    .await;
    let explicit: Envelope<Vec<Movie>> = body_json(
        app()
            .oneshot(get("/recommendation/collaborative-filtering/1"))
            .await
            .unwrap(),
    )
    .await;
    let ids = |env: Envelope<Vec<Movie>>| env.data.unwrap().iter().map(|m| m.info_id).collect::<Vec<_>>();
    assert_eq!(ids(default), ids(explicit));
}

#[tokio::test]
async fn collaborative_unknown_user_fails() {
    let resp = app()
        .oneshot(get("/recommendation/collaborative-filtering/42"))
        .await
        .unwrap();
    let env: Envelope<Vec<Movie>> = body_json(resp).await;
    assert_eq!(env.code, 500);
    assert_eq!(env.msg, "collaborative filtering failed");
}

// --- intent ---

#[tokio::test]
async fn parse_intent_detects_director() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/dify/parseIntent",
            r#"{"userInput":"anything by zhang yimou","userId":"1"}"#,
        ))
        .await
        .unwrap();
    let env: Envelope<RecommendIntent> = body_json(resp).await;
    let intent = env.data.unwrap();
    assert_eq!(intent.intent_type, "director_based");
    assert_eq!(intent.params["director"], "Zhang Yimou");
}

#[tokio::test]
async fn parse_intent_falls_back_to_rating() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/dify/parseIntent",
            r#"{"userInput":"surprise me","userId":"1"}"#,
        ))
        .await
        .unwrap();
    let env: Envelope<RecommendIntent> = body_json(resp).await;
    assert_eq!(env.data.unwrap().intent_type, "rating_based");
}

// --- comments ---

#[tokio::test]
async fn comment_creators_are_distinct_and_sorted() {
    let resp = app().oneshot(get("/comment/creators")).await.unwrap();
    let env: Envelope<Vec<String>> = body_json(resp).await;
    assert_eq!(env.data.unwrap(), vec!["alice", "bob", "carol"]);
}

#[tokio::test]
async fn user_comments_resolve_numeric_ids() {
    let resp = app().oneshot(get("/comment/user/1")).await.unwrap();
    let env: Envelope<Vec<Comment>> = body_json(resp).await;
    assert_eq!(env.data.unwrap().len(), 2);
}

// --- users ---

#[tokio::test]
async fn login_reads_query_string() {
    let resp = app()
        .oneshot(empty_request("POST", "/users/login?username=alice&password=alice-pw"))
        .await
        .unwrap();
    let env: Envelope<User> = body_json(resp).await;
    assert_eq!(env.code, 200);
    assert_eq!(env.data.unwrap().id, 1);
}

#[tokio::test]
async fn login_wrong_password() {
    let resp = app()
        .oneshot(empty_request("POST", "/users/login?username=alice&password=nope"))
        .await
        .unwrap();
    let env: Envelope<User> = body_json(resp).await;
    assert_eq!(env.code, 500);
    assert_eq!(env.msg, "invalid username or password");
}

#[tokio::test]
async fn login_without_query_is_rejected() {
    let resp = app().oneshot(empty_request("POST", "/users/login")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_rejects_malformed_json() {
    let resp = app()
        .oneshot(json_request("POST", "/users", r#"{"name":"x"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- full user and comment lifecycle ---

#[tokio::test]
async fn user_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // name is free
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/users/check-username/dave"))
        .await
        .unwrap();
    let env: Envelope<bool> = body_json(resp).await;
    assert_eq!(env.data, Some(false));

    // register
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/users", r#"{"username":"dave","password":"pw1"}"#))
        .await
        .unwrap();
    let env: Envelope<User> = body_json(resp).await;
    let dave = env.data.unwrap();
    assert_eq!(dave.username, "dave");
    assert_eq!(dave.id, 3);

    // duplicate registration
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/users", r#"{"username":"dave","password":"pw2"}"#))
        .await
        .unwrap();
    let env: Envelope<User> = body_json(resp).await;
    assert_eq!(env.code, 500);

    // name is taken
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/users/check-username/dave"))
        .await
        .unwrap();
    let env: Envelope<bool> = body_json(resp).await;
    assert_eq!(env.data, Some(true));

    // change password, then log in with it
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("PUT", "/users/3/password?newPassword=pw9"))
        .await
        .unwrap();
    let env: Envelope<bool> = body_json(resp).await;
    assert_eq!(env.data, Some(true));

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("POST", "/users/login?username=dave&password=pw9"))
        .await
        .unwrap();
    let env: Envelope<User> = body_json(resp).await;
    assert_eq!(env.code, 200);

    // comment, list, delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/comment",
            r#"{"movieId":5,"content":"lovely","rating":5,"creator":"dave"}"#,
        ))
        .await
        .unwrap();
    let env: Envelope<String> = body_json(resp).await;
    assert_eq!(env.code, 200);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/comment/movie/5"))
        .await
        .unwrap();
    let env: Envelope<Vec<Comment>> = body_json(resp).await;
    let comments = env.data.unwrap();
    assert_eq!(comments.len(), 1);
    let comment_id = comments[0].id;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/comment/{comment_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    let env: Envelope<String> = serde_json::from_slice(&body).unwrap();
    assert_eq!(env.data.as_deref(), Some("comment deleted"));

    // deleting again fails
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/comment/{comment_id}")))
        .await
        .unwrap();
    let env: Envelope<String> = body_json(resp).await;
    assert_eq!(env.code, 500);
}
