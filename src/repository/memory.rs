//! In-memory document store for development runs and tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use super::{BookStore, CollectionOptions, DocumentDatabase};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter, BookPatch},
};

fn poisoned() -> AppError {
    AppError::Store("lock poisoned".into())
}

/// Databases and collections kept in process memory.
///
/// Clone-friendly via Arc; clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    collections: Arc<RwLock<HashMap<(String, String), Arc<MemoryCollection>>>>,
    creations: Arc<AtomicU64>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `create_collection` calls so far
    pub fn creation_count(&self) -> u64 {
        self.creations.load(Ordering::SeqCst)
    }

    fn get_or_default(&self, database: &str, name: &str) -> Arc<MemoryCollection> {
        let key = (database.to_string(), name.to_string());
        // The registry is only ever inserted into, so a poisoned map is still whole
        let collections = self.collections.read().unwrap_or_else(|poison| {
            tracing::warn!("Collection registry lock poisoned; reading through it");
            PoisonError::into_inner(poison)
        });
        match collections.get(&key) {
            Some(existing) => existing.clone(),
            // Handles to collections that were never created behave as empty ones
            None => Arc::new(MemoryCollection::new(CollectionOptions::default())),
        }
    }
}

#[async_trait]
impl DocumentDatabase for MemoryDatabase {
    async fn list_collections(&self, database: &str) -> AppResult<Vec<String>> {
        let collections = self.collections.read().map_err(|_| poisoned())?;
        Ok(collections
            .keys()
            .filter(|(db, _)| db == database)
            .map(|(_, name)| name.clone())
            .collect())
    }

    async fn create_collection(
        &self,
        database: &str,
        name: &str,
        options: CollectionOptions,
    ) -> AppResult<()> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        let key = (database.to_string(), name.to_string());
        if collections.contains_key(&key) {
            return Err(AppError::Store(format!(
                "collection {}.{} already exists",
                database, name
            )));
        }
        collections.insert(key, Arc::new(MemoryCollection::new(options)));
        self.creations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn collection(&self, database: &str, name: &str) -> Arc<dyn BookStore> {
        self.get_or_default(database, name)
    }
}

/// One collection: documents in insertion order
pub struct MemoryCollection {
    options: CollectionOptions,
    documents: RwLock<Vec<Book>>,
    next_id: AtomicU64,
}

impl MemoryCollection {
    fn new(options: CollectionOptions) -> Self {
        Self {
            options,
            documents: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl BookStore for MemoryCollection {
    async fn find(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        Ok(documents
            .iter()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &BookFilter) -> AppResult<u64> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        Ok(documents.iter().filter(|book| filter.matches(book)).count() as u64)
    }

    async fn insert(&self, book: &Book) -> AppResult<Book> {
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        if self.options.unique_logical_id && documents.iter().any(|b| b.id == book.id) {
            return Err(AppError::Conflict(format!(
                "A book with id {} already exists",
                book.id
            )));
        }

        let mut stored = book.clone();
        stored.storage_id = Some(self.next_id.fetch_add(1, Ordering::SeqCst).to_string());
        documents.push(stored.clone());
        Ok(stored)
    }

    async fn update_one(&self, id: &str, patch: &BookPatch) -> AppResult<u64> {
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        match documents.iter_mut().find(|book| book.id == id) {
            Some(book) => {
                patch.apply(book);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_one(&self, id: &str) -> AppResult<u64> {
        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        match documents.iter().position(|book| book.id == id) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
