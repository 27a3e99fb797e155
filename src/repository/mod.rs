//! Document store access.
//!
//! Handlers never see a driver: they reach the store through [`BookStore`],
//! a collection handle obtained from a [`DocumentDatabase`] at startup.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Book, BookFilter, BookPatch},
};

pub use memory::MemoryDatabase;
pub use postgres::PgDatabase;

/// Options applied when a collection is created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionOptions {
    /// Reject a second document carrying the same logical id
    pub unique_logical_id: bool,
}

/// A database holding named collections
#[async_trait]
pub trait DocumentDatabase: Send + Sync {
    async fn list_collections(&self, database: &str) -> AppResult<Vec<String>>;

    async fn create_collection(
        &self,
        database: &str,
        name: &str,
        options: CollectionOptions,
    ) -> AppResult<()>;

    /// Handle to a collection; does not check that it exists
    fn collection(&self, database: &str, name: &str) -> Arc<dyn BookStore>;
}

/// Operations over one collection of book documents
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Documents matching the filter, in store scan order
    async fn find(&self, filter: &BookFilter) -> AppResult<Vec<Book>>;

    async fn count(&self, filter: &BookFilter) -> AppResult<u64>;

    /// Insert and return the document with its storage id set
    async fn insert(&self, book: &Book) -> AppResult<Book>;

    /// Merge the patch into the first document with this logical id.
    /// Returns the number of matched documents (0 or 1).
    async fn update_one(&self, id: &str, patch: &BookPatch) -> AppResult<u64>;

    /// Remove the first document with this logical id.
    /// Returns the number of deleted documents (0 or 1).
    async fn delete_one(&self, id: &str) -> AppResult<u64>;
}
