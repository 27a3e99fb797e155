//! Collection bootstrap

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    repository::{BookStore, CollectionOptions, DocumentDatabase},
};

/// Make sure `database.collection` exists, creating it if absent, and
/// return a handle to it.
///
/// Any failure here is a [`AppError::Bootstrap`]: the caller must not
/// start serving without a usable collection.
pub async fn ensure_collection(
    db: &dyn DocumentDatabase,
    database: &str,
    collection: &str,
    options: CollectionOptions,
) -> AppResult<Arc<dyn BookStore>> {
    if database.is_empty() || collection.is_empty() {
        return Err(AppError::Bootstrap(
            "Database and collection names cannot be empty".to_string(),
        ));
    }

    let names = db.list_collections(database).await.map_err(|e| {
        AppError::Bootstrap(format!("Failed to list collections of {}: {}", database, e))
    })?;

    if names.iter().any(|name| name == collection) {
        tracing::debug!("Collection {}.{} already exists", database, collection);
    } else {
        db.create_collection(database, collection, options)
            .await
            .map_err(|e| {
                AppError::Bootstrap(format!(
                    "Failed to create collection {}.{}: {}",
                    database, collection, e
                ))
            })?;
        tracing::info!("Created collection {}.{}", database, collection);
    }

    Ok(db.collection(database, collection))
}
