//! Books repository

use sqlx::error::ErrorKind;

use crate::{
    db::DbPool,
    error::{AppError, AppResult},
    models::book::{Book, BookDetails, BookWithAuthorRow, CreateBook, UpdateBook},
};

const BOOK_COLUMNS: &str = "id, title, summary, publication_date, author_id";

#[derive(Clone)]
pub struct BooksRepository {
    pool: DbPool,
}

impl BooksRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    /// Get book by ID together with a short view of its author
    pub async fn get_details(&self, id: i64) -> AppResult<Option<BookDetails>> {
        let row = sqlx::query_as::<_, BookWithAuthorRow>(
            r#"
            SELECT b.id, b.title, b.summary, b.publication_date, b.author_id,
                   a.name AS author_name
            FROM books b JOIN authors a ON a.id = b.author_id
            WHERE b.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(BookDetails::from))
    }

    /// List a page of books ordered by id, optionally restricted to one author
    pub async fn list(
        &self,
        skip: i64,
        limit: i64,
        author_id: Option<i64>,
    ) -> AppResult<Vec<BookDetails>> {
        let rows = match author_id {
            Some(author_id) => {
                sqlx::query_as::<_, BookWithAuthorRow>(
                    r#"
                    SELECT b.id, b.title, b.summary, b.publication_date, b.author_id,
                           a.name AS author_name
                    FROM books b JOIN authors a ON a.id = b.author_id
                    WHERE b.author_id = ?
                    ORDER BY b.id LIMIT ? OFFSET ?
                    "#,
                )
                .bind(author_id)
                .bind(limit)
                .bind(skip)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, BookWithAuthorRow>(
                    r#"
                    SELECT b.id, b.title, b.summary, b.publication_date, b.author_id,
                           a.name AS author_name
                    FROM books b JOIN authors a ON a.id = b.author_id
                    ORDER BY b.id LIMIT ? OFFSET ?
                    "#,
                )
                .bind(limit)
                .bind(skip)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows.into_iter().map(BookDetails::from).collect())
    }

    /// Create a new book.
    ///
    /// The referenced author must exist; checked inside the insert
    /// transaction so a failed insert never leaves a partial book behind.
    /// If the foreign key still rejects the insert (author deleted between
    /// check and insert), the transaction rolls back and the failure
    /// surfaces as an integrity violation rather than a crash.
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let author_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM authors WHERE id = ?")
            .bind(data.author_id)
            .fetch_optional(&mut *tx)
            .await?;
        if author_exists.is_none() {
            return Err(AppError::ReferenceNotFound(format!(
                "Author {} not found",
                data.author_id
            )));
        }

        let book = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, summary, publication_date, author_id) \
             VALUES (?, ?, ?, ?) RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&data.title)
        .bind(&data.summary)
        .bind(data.publication_date)
        .bind(data.author_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_integrity)?;

        tx.commit().await?;
        Ok(book)
    }

    /// Apply a partial update; fields absent from the patch are left untouched.
    ///
    /// Changing author_id to a missing author is rejected by the foreign key
    /// and surfaces as an integrity violation.
    pub async fn update(&self, id: i64, patch: &UpdateBook) -> AppResult<Option<Book>> {
        let mut tx = self.pool.begin().await?;

        let Some(mut book) = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        patch.apply(&mut book);

        sqlx::query(
            "UPDATE books SET title = ?, summary = ?, publication_date = ?, author_id = ? \
             WHERE id = ?",
        )
        .bind(&book.title)
        .bind(&book.summary)
        .bind(book.publication_date)
        .bind(book.author_id)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_integrity)?;

        tx.commit().await?;
        Ok(Some(book))
    }

    /// Delete a book and return the deleted snapshot
    pub async fn delete(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "DELETE FROM books WHERE id = ? RETURNING {BOOK_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }
}

/// Map a foreign-key rejection to a domain error; everything else stays a
/// database error
fn map_integrity(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(db) if db.kind() == ErrorKind::ForeignKeyViolation => {
            AppError::IntegrityViolation
        }
        other => AppError::Database(other),
    }
}
