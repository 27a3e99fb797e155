//! Starter data.
//!
//! Presence is judged by full-record equality, not by logical id: a book
//! created independently whose six fields happen to equal a starter record
//! counts as already seeded.

use once_cell::sync::Lazy;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter},
    repository::BookStore,
};

fn starter(id: &str, title: &str, author: &str, edition: &str, pages: &str, year: &str) -> Book {
    Book {
        storage_id: None,
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        edition: edition.to_string(),
        pages: pages.to_string(),
        year: year.to_string(),
    }
}

/// Records inserted on first startup
pub static STARTER_BOOKS: Lazy<Vec<Book>> = Lazy::new(|| {
    vec![
        starter(
            "example1",
            "The Vortex",
            "José Eustasio Rivera",
            "958-30-0804-4",
            "292",
            "1924",
        ),
        starter(
            "example2",
            "Frankenstein",
            "Mary Shelley",
            "978-3-649-64609-9",
            "280",
            "1818",
        ),
        starter(
            "example3",
            "The Black Cat",
            "Edgar Allan Poe",
            "978-3-99168-238-7",
            "280",
            "1843",
        ),
    ]
});

/// Outcome of a seeding run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub existing: usize,
}

/// Insert every record of `books` that is not already present.
///
/// More than one exact match for a record means duplicates already exist,
/// which is reported as [`AppError::Bootstrap`].
pub async fn seed_books(store: &dyn BookStore, books: &[Book]) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    for book in books {
        let matches = store.find(&BookFilter::exact(book)).await?;
        match matches.len() {
            0 => {
                let stored = store.insert(book).await?;
                tracing::info!(
                    "Seeded book id={} storage_id={}",
                    stored.id,
                    stored.storage_id.as_deref().unwrap_or_default()
                );
                report.inserted += 1;
            }
            1 => {
                tracing::debug!("Seed book id={} already present", book.id);
                report.existing += 1;
            }
            n => {
                return Err(AppError::Bootstrap(format!(
                    "Seed book id={} found {} times",
                    book.id, n
                )));
            }
        }
    }

    Ok(report)
}
