//! HTTP handlers and routing

pub mod books;
pub mod health;
pub mod openapi;
pub mod pages;

use axum::{
    async_trait,
    body::HttpBody,
    extract::{rejection::JsonRejection, FromRequest, Request},
    routing::{get, put},
    Json, Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// JSON body extractor whose rejections are reported as 400 Bad Request.
///
/// An empty body, with or without a content type, reads as `T::default()`.
pub struct BookJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for BookJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if req.body().size_hint().exact() == Some(0) {
            return Ok(BookJson(T::default()));
        }

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(BookJson(value))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = ServeDir::new(&state.config.server.static_dir);

    let routes = Router::new()
        // Pages
        .route("/", get(pages::index))
        .route("/books", get(pages::books))
        .route("/authors", get(pages::authors))
        .route("/years", get(pages::years))
        .route("/search", get(pages::search))
        .route("/create", get(pages::create))
        // JSON API
        .route("/api/books", get(books::list_books).post(books::create_book))
        .route("/api/books/:id", put(books::update_book).delete(books::delete_book))
        // Health
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state);

    Router::new()
        .merge(routes)
        .nest_service("/css", static_dir)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
