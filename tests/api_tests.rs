//! API integration tests
//!
//! Built on the real router with an in-memory SQLite pool, so every test
//! exercises the full request path without a running server.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use lectern_server::{
    api,
    config::{AppConfig, DatabaseConfig, LoggingConfig, ServerConfig},
    db,
    repository::Repository,
    AppState,
};

async fn app() -> Router {
    let database = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    let pool = db::connect(&database).await.expect("Failed to create pool");
    db::init_schema(&pool)
        .await
        .expect("Failed to create schema");

    let config = AppConfig {
        server: ServerConfig::default(),
        database,
        logging: LoggingConfig::default(),
    };

    api::router(AppState {
        config: Arc::new(config),
        repository: Repository::new(pool),
    })
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Failed to parse response body")
}

#[tokio::test]
async fn test_health_check() {
    let app = app().await;

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_check() {
    let app = app().await;

    let response = app.oneshot(get_request("/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_create_author() {
    let app = app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/authors",
            &json!({"name": "Jane Doe", "bio": "A mysterious writer"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Jane Doe");
    assert_eq!(body["bio"], "A mysterious writer");
    assert_eq!(body["books"], json!([]));
}

#[tokio::test]
async fn test_create_author_duplicate_name() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/authors", &json!({"name": "Jane Doe"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request("POST", "/authors", &json!({"name": "Jane Doe"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Duplicate");
}

#[tokio::test]
async fn test_create_author_name_too_long() {
    let app = app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/authors",
            &json!({"name": "x".repeat(256)}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Validation");
}

#[tokio::test]
async fn test_get_author_not_found() {
    let app = app().await;

    let response = app.oneshot(get_request("/authors/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"], "NotFound");
}

#[tokio::test]
async fn test_update_author_partial() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/authors",
            &json!({"name": "Jane Doe", "bio": "Original bio"}),
        ))
        .await
        .unwrap();
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/authors/{}", id),
            &json!({"name": "Jane D. Doe"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Omitted bio must survive a full re-fetch
    let response = app
        .oneshot(get_request(&format!("/authors/{}", id)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["name"], "Jane D. Doe");
    assert_eq!(body["bio"], "Original bio");
}

#[tokio::test]
async fn test_delete_author_with_books_is_conflict() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/authors", &json!({"name": "Jane Doe"})))
        .await
        .unwrap();
    let author_id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/authors/{}/books", author_id),
            &json!({"title": "Book A"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let book_id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/authors/{}", author_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Delete the book, then the author
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/books/{}", book_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/authors/{}", author_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_book_for_missing_author() {
    let app = app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/authors/999/books",
            &json!({"title": "Orphan Book"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_authors_pagination() {
    let app = app().await;

    for name in ["A", "B", "C"] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/authors", &json!({"name": name})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get_request("/authors?limit=0"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(get_request("/authors?skip=10"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);

    let response = app
        .oneshot(get_request("/authors?skip=1&limit=1"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "B");
}

/// The end-to-end scenario: Jane Doe, Book A, a rejected Book B, and the
/// filtered book list.
#[tokio::test]
async fn test_catalog_scenario() {
    let app = app().await;

    // Create Jane Doe
    let response = app
        .clone()
        .oneshot(json_request("POST", "/authors", &json!({"name": "Jane Doe"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["id"], 1);

    // Create Book A for Jane
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/books",
            &json!({"title": "Book A", "author_id": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["author"]["name"], "Jane Doe");

    // Book B references a missing author
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/books",
            &json!({"title": "Book B", "author_id": 999}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "ReferenceNotFound");

    // Filtered list returns exactly Book A
    let response = app
        .clone()
        .oneshot(get_request("/books?author_id=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Book A");

    // Jane's details embed Book A without a back-reference
    let response = app.oneshot(get_request("/authors/1")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["books"].as_array().unwrap().len(), 1);
    assert_eq!(body["books"][0]["title"], "Book A");
    assert!(body["books"][0].get("author").is_none());
}

#[tokio::test]
async fn test_update_book_partial() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/authors", &json!({"name": "Jane Doe"})))
        .await
        .unwrap();
    let author_id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/books",
            &json!({
                "title": "Book A",
                "summary": "First edition",
                "publication_date": "1999-04-01",
                "author_id": author_id
            }),
        ))
        .await
        .unwrap();
    let book_id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/books/{}", book_id),
            &json!({"title": "Book A (revised)"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&format!("/books/{}", book_id)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["title"], "Book A (revised)");
    assert_eq!(body["summary"], "First edition");
    assert_eq!(body["publication_date"], "1999-04-01");
}
