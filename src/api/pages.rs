//! Server-rendered pages

use axum::{extract::State, http::StatusCode, response::Html};

use crate::{error::AppResult, views, AppState};

pub async fn index() -> Html<String> {
    Html(views::index_page())
}

pub async fn search() -> Html<String> {
    Html(views::search_page())
}

/// Placeholder route; answers 204 with no body
pub async fn create() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn books(State(state): State<AppState>) -> AppResult<Html<String>> {
    let books = state.services.queries.list_books().await?;
    Ok(Html(views::records_page(
        "Books",
        &["id", "title", "author", "edition", "pages"],
        &views::to_rows(&books),
    )))
}

pub async fn authors(State(state): State<AppState>) -> AppResult<Html<String>> {
    let authors = state.services.queries.authors_summary().await?;
    Ok(Html(views::records_page(
        "Authors",
        &["id", "author", "amountbooks"],
        &views::to_rows(&authors),
    )))
}

pub async fn years(State(state): State<AppState>) -> AppResult<Html<String>> {
    let years = state.services.queries.years_summary().await?;
    Ok(Html(views::records_page(
        "Years",
        &["id", "year"],
        &views::to_rows(&years),
    )))
}
