//! Data models for Lectern

pub mod author;
pub mod book;

// Re-export commonly used types
pub use author::{Author, AuthorDetails, AuthorShort};
pub use book::{Book, BookDetails, BookShort};
