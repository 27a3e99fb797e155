//! PostgreSQL document store tests.
//!
//! They need a reachable server, run with:
//! `DATABASE_URL=postgres://... cargo test -- --ignored`
//! Each test works in its own throwaway schema.

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use bookshelf_server::{
    models::{Book, BookFilter, BookInput, BookPatch},
    repository::{BookStore, CollectionOptions, DocumentDatabase, PgDatabase},
    services::{bootstrap, mutations::generate_id, seed, Services},
    AppError,
};

const COLLECTION: &str = "information";

struct PgFixture {
    pool: PgPool,
    db: PgDatabase,
    schema: String,
}

impl PgFixture {
    async fn new() -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("connect");
        Self {
            db: PgDatabase::new(pool.clone()),
            pool,
            schema: format!("bookshelf_test_{}", generate_id()),
        }
    }

    async fn store(&self, options: CollectionOptions) -> std::sync::Arc<dyn BookStore> {
        bootstrap::ensure_collection(&self.db, &self.schema, COLLECTION, options)
            .await
            .expect("bootstrap")
    }

    async fn cleanup(self) {
        sqlx::query(&format!("DROP SCHEMA \"{}\" CASCADE", self.schema))
            .execute(&self.pool)
            .await
            .expect("drop schema");
    }
}

fn book(id: &str, title: &str) -> Book {
    Book {
        id: id.into(),
        title: title.into(),
        author: "Herbert".into(),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore]
async fn test_pg_bootstrap_twice_reuses_collection() {
    let fixture = PgFixture::new().await;

    let first = fixture.store(CollectionOptions::default()).await;
    first.insert(&book("a", "Dune")).await.unwrap();

    let second = fixture.store(CollectionOptions::default()).await;
    assert_eq!(second.count(&BookFilter::all()).await.unwrap(), 1);

    let names = fixture.db.list_collections(&fixture.schema).await.unwrap();
    assert_eq!(names, vec![COLLECTION.to_string()]);

    fixture.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_pg_seed_twice_is_idempotent() {
    let fixture = PgFixture::new().await;
    let store = fixture.store(CollectionOptions::default()).await;

    let report = seed::seed_books(store.as_ref(), &seed::STARTER_BOOKS).await.unwrap();
    assert_eq!(report.inserted, 3);
    let report = seed::seed_books(store.as_ref(), &seed::STARTER_BOOKS).await.unwrap();
    assert_eq!(report.inserted, 0);
    assert_eq!(report.existing, 3);

    let ids: Vec<String> = store
        .find(&BookFilter::all())
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(ids, vec!["example1", "example2", "example3"]);

    fixture.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_pg_containment_filter_and_duplicate_create() {
    let fixture = PgFixture::new().await;
    let store = fixture.store(CollectionOptions::default()).await;
    let services = Services::new(store.clone(), Duration::from_secs(5));

    let input = BookInput {
        title: "Dune".into(),
        author: "Herbert".into(),
        year: "1965".into(),
        ..Default::default()
    };
    let created = services.mutations.create(input.clone()).await.unwrap();
    assert_eq!(created.id.len(), 32);
    assert!(created.storage_id.is_some());

    let again = services.mutations.create(input).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    // Empty strings take part in the match
    let mut other = created.clone();
    other.edition = "2".into();
    assert_eq!(store.count(&BookFilter::exact(&created)).await.unwrap(), 1);
    assert_eq!(store.count(&BookFilter::exact(&other)).await.unwrap(), 0);

    fixture.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_pg_update_and_delete_touch_first_duplicate_only() {
    let fixture = PgFixture::new().await;
    let store = fixture.store(CollectionOptions::default()).await;
    store.insert(&book("dup", "First")).await.unwrap();
    store.insert(&book("dup", "Second")).await.unwrap();

    let patch = BookPatch::from_input(&BookInput {
        author: "Frank Herbert".into(),
        ..Default::default()
    });
    assert_eq!(store.update_one("dup", &patch).await.unwrap(), 1);

    let books = store.find(&BookFilter::all()).await.unwrap();
    assert_eq!(books[0].author, "Frank Herbert");
    assert_eq!(books[1].author, "Herbert");

    assert_eq!(store.delete_one("dup").await.unwrap(), 1);
    let books = store.find(&BookFilter::all()).await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Second");

    assert_eq!(store.update_one("missing", &patch).await.unwrap(), 0);
    assert_eq!(store.delete_one("missing").await.unwrap(), 0);

    fixture.cleanup().await;
}

#[tokio::test]
#[ignore]
async fn test_pg_unique_logical_id_maps_to_conflict() {
    let fixture = PgFixture::new().await;
    let store = fixture
        .store(CollectionOptions {
            unique_logical_id: true,
        })
        .await;

    store.insert(&book("dune-1", "Dune")).await.unwrap();
    let result = store.insert(&book("dune-1", "Dune Messiah")).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(store.count(&BookFilter::all()).await.unwrap(), 1);

    fixture.cleanup().await;
}
