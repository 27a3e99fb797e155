//! Book model and its derived views.
//!
//! `pages` and `year` are free text on purpose: they are stored and sent as
//! strings and never parsed, so ordering or filtering by them numerically is
//! not supported.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use utoipa::ToSchema;

/// Names of the six external fields, in storage order
pub const BOOK_FIELDS: [&str; 6] = ["id", "title", "author", "edition", "pages", "year"];

/// Stored book document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Book {
    /// Identifier assigned by the store on insert; never part of the JSON contract
    #[serde(skip)]
    pub storage_id: Option<String>,
    /// Logical identifier, generated when empty on create
    pub id: String,
    pub title: String,
    pub author: String,
    pub edition: String,
    pub pages: String,
    pub year: String,
}

/// Book request body for create and update.
///
/// Every field is optional; absent and `null` fields both read as the empty
/// string.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(default)]
pub struct BookInput {
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub title: String,
    #[serde_as(as = "DefaultOnNull")]
    pub author: String,
    #[serde_as(as = "DefaultOnNull")]
    pub edition: String,
    #[serde_as(as = "DefaultOnNull")]
    pub pages: String,
    #[serde_as(as = "DefaultOnNull")]
    pub year: String,
}

impl From<BookInput> for Book {
    fn from(input: BookInput) -> Self {
        Self {
            storage_id: None,
            id: input.id,
            title: input.title,
            author: input.author,
            edition: input.edition,
            pages: input.pages,
            year: input.year,
        }
    }
}

/// Page-oriented row: everything but the year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookListItem {
    pub id: String,
    pub title: String,
    pub author: String,
    pub edition: String,
    pub pages: String,
}

impl From<Book> for BookListItem {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            edition: book.edition,
            pages: book.pages,
        }
    }
}

/// API row with all external fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookApiItem {
    pub id: String,
    pub title: String,
    pub author: String,
    pub pages: String,
    pub edition: String,
    pub year: String,
}

impl From<Book> for BookApiItem {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            pages: book.pages,
            edition: book.edition,
            year: book.year,
        }
    }
}

/// One row per distinct author.
///
/// `id` is the storage id of the first book of that author in scan order.
/// It is incidental and must not be used as a stable key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorSummaryItem {
    pub id: String,
    pub author: String,
    pub amountbooks: u64,
}

/// One row per distinct year, `id` as for [`AuthorSummaryItem`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct YearSummaryItem {
    pub id: String,
    pub year: String,
}
