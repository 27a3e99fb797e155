//! Data models for Bookshelf

pub mod book;
pub mod filter;

// Re-export commonly used types
pub use book::{AuthorSummaryItem, Book, BookApiItem, BookInput, BookListItem, YearSummaryItem};
pub use filter::{BookFilter, BookPatch};
