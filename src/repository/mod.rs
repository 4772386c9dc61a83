//! Repository layer for database operations
//!
//! The sole reader and mutator of persisted entities. Business-rule checks
//! beyond plain storage constraints (referential integrity on book creation,
//! the restrict policy on author deletion) live here; transport concerns do
//! not.

pub mod authors;
pub mod books;

use crate::db::DbPool;

/// Main repository struct holding the database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: DbPool,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            pool,
        }
    }
}
