//! Read-only projections over the whole collection.
//!
//! Every operation is a full scan. Output order follows the store's scan
//! order and is not sorted.

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;

use super::with_deadline;
use crate::{
    error::AppResult,
    models::{AuthorSummaryItem, Book, BookApiItem, BookFilter, BookListItem, YearSummaryItem},
    repository::BookStore,
};

#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn BookStore>,
    deadline: Duration,
}

impl QueryService {
    pub fn new(store: Arc<dyn BookStore>, deadline: Duration) -> Self {
        Self { store, deadline }
    }

    async fn scan(&self) -> AppResult<Vec<Book>> {
        with_deadline(self.deadline, self.store.find(&BookFilter::all())).await
    }

    /// Rows for the books page
    pub async fn list_books(&self) -> AppResult<Vec<BookListItem>> {
        Ok(self.scan().await?.into_iter().map(BookListItem::from).collect())
    }

    /// Rows for the JSON API
    pub async fn list_books_api(&self) -> AppResult<Vec<BookApiItem>> {
        Ok(self.scan().await?.into_iter().map(BookApiItem::from).collect())
    }

    pub async fn authors_summary(&self) -> AppResult<Vec<AuthorSummaryItem>> {
        Ok(summarize_authors(&self.scan().await?))
    }

    pub async fn years_summary(&self) -> AppResult<Vec<YearSummaryItem>> {
        Ok(summarize_years(&self.scan().await?))
    }

    /// Number of books; used by the readiness probe
    pub async fn count(&self) -> AppResult<u64> {
        with_deadline(self.deadline, self.store.count(&BookFilter::all())).await
    }
}

fn storage_id(book: &Book) -> String {
    book.storage_id.clone().unwrap_or_default()
}

/// Group by exact author string, first-encountered order
pub fn summarize_authors(books: &[Book]) -> Vec<AuthorSummaryItem> {
    let mut groups: IndexMap<&str, (String, u64)> = IndexMap::new();
    for book in books {
        groups
            .entry(book.author.as_str())
            .or_insert_with(|| (storage_id(book), 0))
            .1 += 1;
    }

    groups
        .into_iter()
        .map(|(author, (id, amountbooks))| AuthorSummaryItem {
            id,
            author: author.to_string(),
            amountbooks,
        })
        .collect()
}

/// One row per distinct year, first-encountered order
pub fn summarize_years(books: &[Book]) -> Vec<YearSummaryItem> {
    let mut years: IndexMap<&str, String> = IndexMap::new();
    for book in books {
        years
            .entry(book.year.as_str())
            .or_insert_with(|| storage_id(book));
    }

    years
        .into_iter()
        .map(|(year, id)| YearSummaryItem {
            id,
            year: year.to_string(),
        })
        .collect()
}
