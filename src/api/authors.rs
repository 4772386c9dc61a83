//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorDetails, AuthorQuery, CreateAuthor, UpdateAuthor},
        book::{BookDetails, CreateBookForAuthor},
    },
};

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = AuthorDetails),
        (status = 400, description = "Invalid input or name already exists")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<AuthorDetails>)> {
    data.validate()?;

    // Advisory pre-check for a friendly error; the UNIQUE constraint on
    // name backstops the race between check and insert.
    if state.repository.authors.get_by_name(&data.name).await?.is_some() {
        return Err(AppError::Duplicate(format!(
            "Author '{}' already exists",
            data.name
        )));
    }

    let author = state.repository.authors.create(&data).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthorDetails::from_parts(author, Vec::new())),
    ))
}

/// List authors with offset/limit pagination
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "List of authors", body = Vec<AuthorDetails>)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<AuthorQuery>,
) -> AppResult<Json<Vec<AuthorDetails>>> {
    let skip = query.skip.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(100).max(0);

    let authors = state.repository.authors.list(skip, limit).await?;
    Ok(Json(authors))
}

/// Get author details by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetails),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AuthorDetails>> {
    let author = state
        .repository
        .authors
        .get_details(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;
    Ok(Json(author))
}

/// Update an author (partial update)
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = AuthorDetails),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<UpdateAuthor>,
) -> AppResult<Json<AuthorDetails>> {
    patch.validate()?;

    state
        .repository
        .authors
        .update(id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;

    let details = state
        .repository
        .authors
        .get_details(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;
    Ok(Json(details))
}

/// Delete an author (fails if books still reference it)
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Deleted author", body = Author),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Author still has books")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Author>> {
    let author = state
        .repository
        .authors
        .delete(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;
    Ok(Json(author))
}

/// Create a book under a given author.
///
/// The body carries no author_id; it is merged in from the path.
#[utoipa::path(
    post,
    path = "/authors/{id}/books",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    request_body = CreateBookForAuthor,
    responses(
        (status = 201, description = "Book created", body = BookDetails),
        (status = 404, description = "Author not found")
    )
)]
pub async fn create_book_for_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(data): Json<CreateBookForAuthor>,
) -> AppResult<(StatusCode, Json<BookDetails>)> {
    data.validate()?;

    let book = state.repository.books.create(&data.with_author(id)).await?;
    let details = state
        .repository
        .books
        .get_details(book.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book.id)))?;
    Ok((StatusCode::CREATED, Json(details)))
}
