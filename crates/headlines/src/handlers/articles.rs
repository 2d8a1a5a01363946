//! Article listing and detail routes.
//!
//! All listings are for the fetch day (yesterday, UTC).

use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};

use headlines_core::article::{fetch_day, Article, ArticleSummary, Category};

use crate::{handlers::AppError, state::AppState};

/// GET / - Redirect to the full listing.
#[axum::debug_handler]
pub async fn index() -> Redirect {
    Redirect::to("/articles/all")
}

/// GET /articles/all - Every article of the fetch day.
#[axum::debug_handler]
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<ArticleSummary>>, AppError> {
    let articles = state.service.list_all(fetch_day()).await?;
    Ok(Json(articles))
}

/// GET /articles/{category} - Articles of one category.
///
/// The category is validated before the service is called; an unknown name
/// is a 422.
#[axum::debug_handler]
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ArticleSummary>>, AppError> {
    let category: Category = category.parse()?;
    let articles = state
        .service
        .list_by_category(category, fetch_day())
        .await?;
    Ok(Json(articles))
}

/// GET /articles/about/{id} - One article. Counts a view.
#[axum::debug_handler]
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Article>, AppError> {
    let article = state.service.detail(id).await?;
    Ok(Json(article))
}
