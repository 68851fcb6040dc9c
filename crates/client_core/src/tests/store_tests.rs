use super::*;
use anyhow::Result;
use axum::{
    body::Bytes,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

async fn spawn_store(app: Router) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn json_body(body: &'static str) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], body)
}

async fn spawn_list_store(status: StatusCode, body: &'static str) -> Result<String> {
    let app = Router::new().route(
        "/movies.json",
        get(move || async move { (status, json_body(body)) }),
    );
    spawn_store(app).await
}

#[derive(Debug)]
struct CapturedPost {
    content_type: Option<String>,
    body: serde_json::Value,
}

async fn spawn_create_store(
    status: StatusCode,
    reply: &'static str,
) -> Result<(String, oneshot::Receiver<CapturedPost>)> {
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));
    let app = Router::new().route(
        "/movies.json",
        axum::routing::post(move |headers: HeaderMap, body: Bytes| {
            let tx = Arc::clone(&tx);
            async move {
                let captured = CapturedPost {
                    content_type: headers
                        .get(header::CONTENT_TYPE)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string),
                    body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
                };
                if let Some(tx) = tx.lock().await.take() {
                    let _ = tx.send(captured);
                }
                (status, json_body(reply))
            }
        }),
    );
    Ok((spawn_store(app).await?, rx))
}

#[tokio::test]
async fn list_keeps_key_order_and_drops_unknown_fields() {
    let base = spawn_list_store(
        StatusCode::OK,
        r#"{
            "-Nz3": {"title": "Return of the Jedi", "openingText": "Luke returns", "releaseDate": "1983-05-25", "director": "Marquand"},
            "-Na1": {"title": "A New Hope", "openingText": "It is a period of civil war", "releaseDate": "1977-05-25"},
            "-Nm2": {"title": "The Empire Strikes Back", "openingText": "It is a dark time", "releaseDate": "1980-05-17", "rating": 9}
        }"#,
    )
    .await
    .expect("spawn store");
    let store = HttpMovieStore::new(&base).expect("store");

    let movies = store.list_movies().await.expect("list");

    let ids: Vec<&str> = movies.iter().map(|movie| movie.id.as_str()).collect();
    assert_eq!(ids, vec!["-Nz3", "-Na1", "-Nm2"]);
    assert_eq!(
        movies[0],
        Movie {
            id: MovieId::from("-Nz3"),
            title: "Return of the Jedi".to_string(),
            opening_text: "Luke returns".to_string(),
            release_date: "1983-05-25".to_string(),
        }
    );
}

#[tokio::test]
async fn list_treats_null_and_empty_collections_as_no_movies() {
    for body in ["null", "{}"] {
        let base = spawn_list_store(StatusCode::OK, body)
            .await
            .expect("spawn store");
        let store = HttpMovieStore::new(&base).expect("store");
        assert!(store.list_movies().await.expect("list").is_empty());
    }
}

#[tokio::test]
async fn list_failure_status_uses_generic_message() {
    let base = spawn_list_store(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"error": "database exploded"}"#,
    )
    .await
    .expect("spawn store");
    let store = HttpMovieStore::new(&base).expect("store");

    let err = store.list_movies().await.expect_err("must fail");
    assert!(matches!(
        err,
        StoreError::Status {
            operation: StoreOperation::ListMovies,
            status: 500
        }
    ));
    assert_eq!(err.to_string(), "Something went wrong");
}

#[tokio::test]
async fn list_rejects_bodies_that_are_not_collections() {
    let cases = [
        "not json at all",
        r#"["a", "b"]"#,
        r#"{"-Na1": {"title": "Missing fields"}}"#,
    ];
    for body in cases {
        let base = spawn_list_store(StatusCode::OK, body)
            .await
            .expect("spawn store");
        let store = HttpMovieStore::new(&base).expect("store");
        let err = store.list_movies().await.expect_err("must fail");
        assert!(matches!(err, StoreError::Parse(_)), "body {body}: {err:?}");
    }
}

#[tokio::test]
async fn list_reports_transport_errors_when_store_is_unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let store = HttpMovieStore::new(&format!("http://{addr}")).expect("store");
    let err = store.list_movies().await.expect_err("must fail");
    assert!(matches!(err, StoreError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn create_posts_camel_case_json_document() {
    let (base, captured) = spawn_create_store(StatusCode::OK, r#"{"name": "-Nq9"}"#)
        .await
        .expect("spawn store");
    let store = HttpMovieStore::new(&base).expect("store");

    let reply = store
        .create_movie(&NewMovie::new("Dune", "Spice must flow", "2021-10-22"))
        .await
        .expect("create");
    assert_eq!(reply, serde_json::json!({ "name": "-Nq9" }));

    let captured = captured.await.expect("captured request");
    assert_eq!(captured.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        captured.body,
        serde_json::json!({
            "title": "Dune",
            "openingText": "Spice must flow",
            "releaseDate": "2021-10-22"
        })
    );
}

#[tokio::test]
async fn create_failure_status_uses_generic_message() {
    let (base, _captured) = spawn_create_store(StatusCode::FORBIDDEN, r#"{"error": "denied"}"#)
        .await
        .expect("spawn store");
    let store = HttpMovieStore::new(&base).expect("store");

    let err = store
        .create_movie(&NewMovie::new("Dune", "Spice must flow", "2021-10-22"))
        .await
        .expect_err("must fail");
    assert_eq!(err.to_string(), "Failed to POST new movie.");
}

#[test]
fn collection_url_tolerates_trailing_slashes_and_paths() {
    assert_eq!(
        collection_url("http://127.0.0.1:9000", MOVIES_COLLECTION)
            .expect("url")
            .as_str(),
        "http://127.0.0.1:9000/movies.json"
    );
    assert_eq!(
        collection_url("https://example.test/db/", MOVIES_COLLECTION)
            .expect("url")
            .as_str(),
        "https://example.test/db/movies.json"
    );
}

#[test]
fn invalid_base_url_is_rejected_up_front() {
    let err = HttpMovieStore::new("not a url").expect_err("must fail");
    assert!(matches!(err, StoreError::InvalidBaseUrl(_)));
}

#[test]
fn store_exposes_the_movies_collection_url() {
    let store = HttpMovieStore::new(crate::DEFAULT_STORE_URL).expect("store");
    assert_eq!(
        store.collection_url().as_str(),
        "https://react-http-fd65a-default-rtdb.firebaseio.com/movies.json"
    );
}
