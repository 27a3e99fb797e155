//! PostgreSQL-backed document store.
//!
//! A database maps to a schema and a collection to a table of JSONB
//! documents keyed by an identity column:
//!
//! ```sql
//! CREATE TABLE "<database>"."<collection>" (
//!     _id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
//!     doc JSONB NOT NULL
//! )
//! ```
//!
//! Exact-match filters use JSONB containment, and scans run in `_id` order,
//! which is insertion order.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, Pool, Postgres};

use super::{BookStore, CollectionOptions, DocumentDatabase};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter, BookPatch},
};

/// Quote an identifier for interpolation into SQL
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[derive(Clone)]
pub struct PgDatabase {
    pool: Pool<Postgres>,
}

impl PgDatabase {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Open a pool, giving up once `timeout` has elapsed
    pub async fn connect(url: &str, max_connections: u32, timeout: Duration) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(timeout)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl DocumentDatabase for PgDatabase {
    async fn list_collections(&self, database: &str) -> AppResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT table_name::text FROM information_schema.tables WHERE table_schema = $1",
        )
        .bind(database)
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    async fn create_collection(
        &self,
        database: &str,
        name: &str,
        options: CollectionOptions,
    ) -> AppResult<()> {
        let schema = quote_ident(database);
        let table = format!("{}.{}", schema, quote_ident(name));

        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
            .execute(&mut *tx)
            .await?;

        sqlx::query(&format!(
            "CREATE TABLE {} (_id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY, doc JSONB NOT NULL)",
            table
        ))
        .execute(&mut *tx)
        .await?;

        let index = quote_ident(&format!("{}_logical_id_idx", name));
        let unique = if options.unique_logical_id { "UNIQUE " } else { "" };
        sqlx::query(&format!(
            "CREATE {}INDEX {} ON {} ((doc->>'id'))",
            unique, index, table
        ))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    fn collection(&self, database: &str, name: &str) -> Arc<dyn BookStore> {
        Arc::new(PgCollection {
            pool: self.pool.clone(),
            table: format!("{}.{}", quote_ident(database), quote_ident(name)),
        })
    }
}

/// Handle to one document table
pub struct PgCollection {
    pool: Pool<Postgres>,
    /// Fully qualified, quoted table name
    table: String,
}

#[async_trait]
impl BookStore for PgCollection {
    async fn find(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, (i64, Json<Book>)>(&format!(
            "SELECT _id, doc FROM {} WHERE doc @> $1 ORDER BY _id",
            self.table
        ))
        .bind(filter.to_json())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(storage_id, Json(mut book))| {
                book.storage_id = Some(storage_id.to_string());
                book
            })
            .collect())
    }

    async fn count(&self, filter: &BookFilter) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE doc @> $1",
            self.table
        ))
        .bind(filter.to_json())
        .fetch_one(&self.pool)
        .await?;
        Ok(count as u64)
    }

    async fn insert(&self, book: &Book) -> AppResult<Book> {
        let result = sqlx::query_scalar::<_, i64>(&format!(
            "INSERT INTO {} (doc) VALUES ($1) RETURNING _id",
            self.table
        ))
        .bind(Json(book))
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(storage_id) => {
                let mut stored = book.clone();
                stored.storage_id = Some(storage_id.to_string());
                Ok(stored)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
                format!("A book with id {} already exists", book.id),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_one(&self, id: &str, patch: &BookPatch) -> AppResult<u64> {
        let result = sqlx::query(&format!(
            r#"
            UPDATE {table} SET doc = doc || $2
            WHERE _id = (SELECT _id FROM {table} WHERE doc->>'id' = $1 ORDER BY _id LIMIT 1)
            "#,
            table = self.table
        ))
        .bind(id)
        .bind(patch.to_json())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_one(&self, id: &str) -> AppResult<u64> {
        let result = sqlx::query(&format!(
            r#"
            DELETE FROM {table}
            WHERE _id = (SELECT _id FROM {table} WHERE doc->>'id' = $1 ORDER BY _id LIMIT 1)
            "#,
            table = self.table
        ))
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
