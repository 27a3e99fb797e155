//! Create, partial update and delete, keyed by the logical id.
//!
//! Create checks for duplicates and then inserts as two separate store
//! calls, so two identical concurrent creates can both succeed unless the
//! collection enforces unique logical ids.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use super::with_deadline;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter, BookInput, BookPatch},
    repository::BookStore,
};

/// New logical id: 32 lowercase hex characters
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Clone)]
pub struct MutationService {
    store: Arc<dyn BookStore>,
    deadline: Duration,
}

impl MutationService {
    pub fn new(store: Arc<dyn BookStore>, deadline: Duration) -> Self {
        Self { store, deadline }
    }

    /// Insert a book, generating its id when empty.
    ///
    /// Fails with Conflict only when a book equal on all supplied fields
    /// exists; a book sharing the id but differing elsewhere is not a
    /// duplicate. Without an id the check runs on the five other fields, so
    /// repeating the same id-less body is rejected.
    pub async fn create(&self, input: BookInput) -> AppResult<Book> {
        let mut book = Book::from(input);
        let filter = if book.id.is_empty() {
            BookFilter::exact_except_id(&book)
        } else {
            BookFilter::exact(&book)
        };

        let duplicates = with_deadline(self.deadline, self.store.count(&filter)).await?;
        if duplicates > 0 {
            tracing::warn!("Rejected duplicate book title={:?}", book.title);
            return Err(AppError::Conflict("duplicate".to_string()));
        }

        if book.id.is_empty() {
            book.id = generate_id();
        }

        let stored = with_deadline(self.deadline, self.store.insert(&book)).await?;
        tracing::info!("Created book id={}", stored.id);
        Ok(stored)
    }

    /// Overwrite the non-empty fields of `input` on the book `id`
    pub async fn update(&self, id: &str, input: &BookInput) -> AppResult<()> {
        let patch = BookPatch::from_input(input);
        let matched = with_deadline(self.deadline, self.store.update_one(id, &patch)).await?;
        if matched == 0 {
            tracing::warn!("Update of unknown book id={}", id);
            return Err(AppError::NotFound("Not found id".to_string()));
        }
        tracing::info!("Updated book id={}", id);
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let deleted = with_deadline(self.deadline, self.store.delete_one(id)).await?;
        if deleted == 0 {
            tracing::warn!("Delete of unknown book id={}", id);
            return Err(AppError::NotFound("Not found id".to_string()));
        }
        tracing::info!("Deleted book id={}", id);
        Ok(())
    }
}
