//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDetails, BookQuery, CreateBook, UpdateBook},
};

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookDetails),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Referenced author not found")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookDetails>)> {
    data.validate()?;

    let book = state.repository.books.create(&data).await?;
    let details = state
        .repository
        .books
        .get_details(book.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book.id)))?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// List books with offset/limit pagination and an optional author filter
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "List of books", body = Vec<BookDetails>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<BookDetails>>> {
    let skip = query.skip.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(100).max(0);

    let books = state
        .repository
        .books
        .list(skip, limit, query.author_id)
        .await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<BookDetails>> {
    let book = state
        .repository
        .books
        .get_details(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
    Ok(Json(book))
}

/// Update a book (partial update)
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<UpdateBook>,
) -> AppResult<Json<BookDetails>> {
    patch.validate()?;

    state
        .repository
        .books
        .update(id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

    let details = state
        .repository
        .books
        .get_details(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
    Ok(Json(details))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Deleted book", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    let book = state
        .repository
        .books
        .delete(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
    Ok(Json(book))
}
