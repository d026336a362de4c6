use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::{json, Value};

use cinefav_api::{http_client, ApiError, FavoritesClient, FavoritesStore, MovieSearch, SearchClient};
use cinefav_core::identity::StaticIdentity;
use cinefav_core::models::MovieItem;

type Log = Arc<Mutex<Vec<String>>>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn render_query(params: &HashMap<String, String>) -> String {
    let mut pairs: Vec<_> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    pairs.sort();
    pairs.join("&")
}

fn stub_router(log: Log) -> Router {
    async fn search(
        State(log): State<Log>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        log.lock().unwrap().push(format!("GET search {}", render_query(&params)));
        Json(json!({
            "results": [
                { "imdbID": "tt0096895", "Title": "Batman", "Year": "1989", "Poster": "N/A", "Type": "movie" }
            ],
            "totalPages": 3
        }))
    }

    async fn list_favorites(
        State(log): State<Log>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Value> {
        log.lock().unwrap().push(format!("GET favorites {}", render_query(&params)));
        Json(json!({
            "results": [
                { "id": "tt0096895", "title": "Batman", "year": "1989", "poster": "N/A", "type": "movie" }
            ],
            "totalPages": 2
        }))
    }

    async fn add_favorite(
        State(log): State<Log>,
        Query(params): Query<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        log.lock()
            .unwrap()
            .push(format!("POST favorites {} {body}", render_query(&params)));
        (StatusCode::CREATED, Json(body))
    }

    async fn remove_favorite(
        State(log): State<Log>,
        Path(id): Path<String>,
        Query(params): Query<HashMap<String, String>>,
    ) -> StatusCode {
        log.lock()
            .unwrap()
            .push(format!("DELETE favorites/{id} {}", render_query(&params)));
        StatusCode::OK
    }

    Router::new()
        .route("/api/movies/search", get(search))
        .route(
            "/api/movies/favorites",
            get(list_favorites).post(add_favorite),
        )
        .route("/api/movies/favorites/{id}", delete(remove_favorite))
        .with_state(log)
}

fn favorites_client(base: &str) -> FavoritesClient {
    FavoritesClient::new(
        base,
        http_client(None).unwrap(),
        Arc::new(StaticIdentity("user-42".into())),
    )
    .unwrap()
}

#[tokio::test]
async fn search_sends_query_and_page_and_normalizes() {
    let log = Log::default();
    let base = serve(stub_router(log.clone())).await;
    let client = SearchClient::new(&base, http_client(None).unwrap()).unwrap();

    let page = client.search("dark knight", 2).await.unwrap();

    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, "tt0096895");
    assert_eq!(page.items[0].title, "Batman");
    assert_eq!(page.items[0].poster_url(), None);
    assert_eq!(
        log.lock().unwrap().as_slice(),
        ["GET search page=2&q=dark knight"]
    );
}

#[tokio::test]
async fn favorites_calls_are_scoped_to_user() {
    let log = Log::default();
    let base = serve(stub_router(log.clone())).await;
    let client = favorites_client(&base);

    let page = client.list(1, 15).await.unwrap();
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items[0].id, "tt0096895");

    let item = MovieItem {
        id: "tt0372784".into(),
        title: "Batman Begins".into(),
        year: "2005".into(),
        poster: Some("https://img.example/begins.jpg".into()),
        kind: "movie".into(),
    };
    client.add(&item).await.unwrap();
    client.remove("tt0372784").await.unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log[0], "GET favorites limit=15&page=1&userId=user-42");
    assert!(log[1].starts_with("POST favorites userId=user-42 "));
    let body: Value = serde_json::from_str(log[1].splitn(4, ' ').nth(3).unwrap()).unwrap();
    assert_eq!(
        body,
        json!({
            "id": "tt0372784",
            "title": "Batman Begins",
            "year": "2005",
            "poster": "https://img.example/begins.jpg",
            "type": "movie"
        })
    );
    assert_eq!(log[2], "DELETE favorites/tt0372784 userId=user-42");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let router = Router::new().route(
        "/api/movies/search",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream down") }),
    );
    let base = serve(router).await;
    let client = SearchClient::new(&base, http_client(None).unwrap()).unwrap();

    let err = client.search("batman", 1).await.unwrap_err();
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream down");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let router = Router::new().route("/api/movies/search", get(|| async { "not json" }));
    let base = serve(router).await;
    let client = SearchClient::new(&base, http_client(None).unwrap()).unwrap();

    let err = client.search("batman", 1).await.unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn unreachable_server_is_an_http_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = SearchClient::new(&format!("http://{addr}/api"), http_client(None).unwrap()).unwrap();
    let err = client.search("batman", 1).await.unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
}
