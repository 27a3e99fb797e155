//! Book JSON endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::BookJson;
use crate::{
    error::AppResult,
    models::{Book, BookApiItem, BookInput},
    AppState,
};

/// List all books
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    responses(
        (status = 200, description = "All books, in store order", body = Vec<BookApiItem>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<BookApiItem>>> {
    let books = state.services.queries.list_books_api().await?;
    Ok(Json(books))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Malformed body", body = crate::error::ErrorResponse),
        (status = 409, description = "Identical book already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    BookJson(input): BookJson<BookInput>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.mutations.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update the non-empty fields of a book
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Logical book id")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated"),
        (status = 400, description = "Malformed body", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown id", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    BookJson(input): BookJson<BookInput>,
) -> AppResult<StatusCode> {
    state.services.mutations.update(&id, &input).await?;
    Ok(StatusCode::OK)
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Logical book id")),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 404, description = "Unknown id", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.mutations.delete(&id).await?;
    Ok(StatusCode::OK)
}
