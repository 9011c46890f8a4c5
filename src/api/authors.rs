//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        author::AuthorDetail,
        pagination::{AuthorPage, PageQuery},
    },
    AppState,
};

/// List authors, paginated
#[utoipa::path(
    get,
    path = "/authors",
    tag = "catalog",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of authors", body = AuthorPage),
        (status = 404, description = "Page out of range")
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<AuthorPage>> {
    let page = state.services.catalog.list_authors(query.page.as_deref()).await?;
    Ok(Json(page))
}

/// Get an author and their books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "catalog",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = AuthorDetail),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state.services.catalog.get_author(&id).await?;
    Ok(Json(author))
}
