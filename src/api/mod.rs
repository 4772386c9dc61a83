//! API handlers for Lectern REST endpoints
//!
//! Handlers translate HTTP requests into repository calls and domain
//! failures into status codes; no business rules live here beyond the
//! advisory duplicate-name pre-check on author creation.

pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authors
        .route("/authors", get(authors::list_authors))
        .route("/authors", post(authors::create_author))
        .route("/authors/:id", get(authors::get_author))
        .route("/authors/:id", put(authors::update_author))
        .route("/authors/:id", delete(authors::delete_author))
        .route("/authors/:id/books", post(authors::create_book_for_author))
        // Books
        .route("/books", get(books::list_books))
        .route("/books", post(books::create_book))
        .route("/books/:id", get(books::get_book))
        .route("/books/:id", put(books::update_book))
        .route("/books/:id", delete(books::delete_book))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    routes
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
