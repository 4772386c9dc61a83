//! Book model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::author::AuthorShort;

/// Full book row from the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub author_id: i64,
}

/// Short book view embedded in author responses (no back-reference)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub publication_date: Option<NaiveDate>,
}

impl From<Book> for BookShort {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            summary: book.summary,
            publication_date: book.publication_date,
        }
    }
}

/// Book response with a short view of its author
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetails {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub author_id: i64,
    pub author: AuthorShort,
}

/// Flat row shape produced by the books/authors join
#[derive(Debug, Clone, FromRow)]
pub struct BookWithAuthorRow {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub author_id: i64,
    pub author_name: String,
}

impl From<BookWithAuthorRow> for BookDetails {
    fn from(row: BookWithAuthorRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            summary: row.summary,
            publication_date: row.publication_date,
            author_id: row.author_id,
            author: AuthorShort {
                id: row.author_id,
                name: row.author_name,
            },
        }
    }
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,
    pub summary: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub author_id: i64,
}

/// Create book request for the nested /authors/{id}/books route.
///
/// The author id comes from the path, so the body must not carry one.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookForAuthor {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,
    pub summary: Option<String>,
    pub publication_date: Option<NaiveDate>,
}

impl CreateBookForAuthor {
    /// Merge in the author id from the enclosing route
    pub fn with_author(self, author_id: i64) -> CreateBook {
        CreateBook {
            title: self.title,
            summary: self.summary,
            publication_date: self.publication_date,
            author_id,
        }
    }
}

/// Update book request; absent fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: Option<String>,
    pub summary: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub author_id: Option<i64>,
}

impl UpdateBook {
    /// Merge the supplied fields onto an existing book row
    pub fn apply(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(summary) = &self.summary {
            book.summary = Some(summary.clone());
        }
        if let Some(date) = self.publication_date {
            book.publication_date = Some(date);
        }
        if let Some(author_id) = self.author_id {
            book.author_id = author_id;
        }
    }
}

/// Query parameters for listing books
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Number of books to skip (default: 0)
    pub skip: Option<i64>,
    /// Maximum number of books to return (default: 100)
    pub limit: Option<i64>,
    /// Restrict to books of a single author
    pub author_id: Option<i64>,
}
