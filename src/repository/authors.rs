//! Authors repository

use std::collections::HashMap;

use sqlx::error::ErrorKind;

use crate::{
    db::DbPool,
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorDetails, CreateAuthor, UpdateAuthor},
        book::{Book, BookShort},
    },
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: DbPool,
}

impl AuthorsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get author by ID
    pub async fn get(&self, id: i64) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>("SELECT id, name, bio FROM authors WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    /// Get author by name (used by the API layer's duplicate pre-check)
    pub async fn get_by_name(&self, name: &str) -> AppResult<Option<Author>> {
        let author =
            sqlx::query_as::<_, Author>("SELECT id, name, bio FROM authors WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(author)
    }

    /// Get author by ID together with its books
    pub async fn get_details(&self, id: i64) -> AppResult<Option<AuthorDetails>> {
        let Some(author) = self.get(id).await? else {
            return Ok(None);
        };

        let books = sqlx::query_as::<_, BookShort>(
            "SELECT id, title, summary, publication_date FROM books WHERE author_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(AuthorDetails::from_parts(author, books)))
    }

    /// List a page of authors, each with its books, ordered by id
    pub async fn list(&self, skip: i64, limit: i64) -> AppResult<Vec<AuthorDetails>> {
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, name, bio FROM authors ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        // One extra query for the whole page instead of one per author
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, summary, publication_date, author_id FROM books
            WHERE author_id IN (SELECT id FROM authors ORDER BY id LIMIT ? OFFSET ?)
            ORDER BY id
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        let mut by_author: HashMap<i64, Vec<BookShort>> = HashMap::new();
        for book in books {
            by_author
                .entry(book.author_id)
                .or_default()
                .push(book.into());
        }

        Ok(authors
            .into_iter()
            .map(|author| {
                let books = by_author.remove(&author.id).unwrap_or_default();
                AuthorDetails::from_parts(author, books)
            })
            .collect())
    }

    /// Create a new author.
    ///
    /// No duplicate-name pre-check here; the API layer performs one for a
    /// friendly error, and the UNIQUE constraint on name backstops the race.
    pub async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name, bio) VALUES (?, ?) RETURNING id, name, bio",
        )
        .bind(&data.name)
        .bind(&data.bio)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_name_collision(e, &data.name))
    }

    /// Apply a partial update; fields absent from the patch are left untouched
    pub async fn update(&self, id: i64, patch: &UpdateAuthor) -> AppResult<Option<Author>> {
        let mut tx = self.pool.begin().await?;

        let Some(mut author) =
            sqlx::query_as::<_, Author>("SELECT id, name, bio FROM authors WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
        else {
            return Ok(None);
        };

        patch.apply(&mut author);

        sqlx::query("UPDATE authors SET name = ?, bio = ? WHERE id = ?")
            .bind(&author.name)
            .bind(&author.bio)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_name_collision(e, &author.name))?;

        tx.commit().await?;
        Ok(Some(author))
    }

    /// Delete an author and return the deleted snapshot.
    ///
    /// Restrict policy: an author that still has books cannot be deleted,
    /// so books are never silently orphaned.
    pub async fn delete(&self, id: i64) -> AppResult<Option<Author>> {
        let mut tx = self.pool.begin().await?;

        let Some(author) =
            sqlx::query_as::<_, Author>("SELECT id, name, bio FROM authors WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
        else {
            return Ok(None);
        };

        let book_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if book_count > 0 {
            return Err(AppError::Conflict(format!(
                "Author {} still has {} book(s)",
                id, book_count
            )));
        }

        sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(author))
    }
}

/// Map a lost race on the UNIQUE(name) constraint to a domain error
fn map_name_collision(err: sqlx::Error, name: &str) -> AppError {
    match err {
        sqlx::Error::Database(db) if db.kind() == ErrorKind::UniqueViolation => {
            AppError::Duplicate(format!("Author '{}' already exists", name))
        }
        other => AppError::Database(other),
    }
}
