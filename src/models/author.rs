//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::book::BookShort;

/// Full author row from the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
}

/// Short author view embedded in book responses.
///
/// Only id and name are rendered here so the author/book relationship
/// never recurses: books carry this view, authors carry [`BookShort`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuthorShort {
    pub id: i64,
    pub name: String,
}

/// Author response with its books
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorDetails {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub books: Vec<BookShort>,
}

impl AuthorDetails {
    pub fn from_parts(author: Author, books: Vec<BookShort>) -> Self {
        Self {
            id: author.id,
            name: author.name,
            bio: author.bio,
            books,
        }
    }
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: String,
    pub bio: Option<String>,
}

/// Update author request; absent fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: Option<String>,
    pub bio: Option<String>,
}

impl UpdateAuthor {
    /// Merge the supplied fields onto an existing author row
    pub fn apply(&self, author: &mut Author) {
        if let Some(name) = &self.name {
            author.name = name.clone();
        }
        if let Some(bio) = &self.bio {
            author.bio = Some(bio.clone());
        }
    }
}

/// Query parameters for listing authors
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AuthorQuery {
    /// Number of authors to skip (default: 0)
    pub skip: Option<i64>,
    /// Maximum number of authors to return (default: 100)
    pub limit: Option<i64>,
}
