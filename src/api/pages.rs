//! Page API endpoints.

use axum::extract::{Path, State};

use super::{revalidate, success, ApiJson, ApiResult};
use crate::cache::{Stale, HOME_ROUTE, PAGES_PREFIX, POSTS_PREFIX};
use crate::db::or_empty;
use crate::errors::AppError;
use crate::models::{Page, PageRequest};
use crate::validation::FormSchema;
use crate::AppState;

/// Pages feed the navigation of every public view.
fn navigation_stale() -> [Stale; 3] {
    [
        Stale::Route(HOME_ROUTE.to_string()),
        Stale::Prefix(PAGES_PREFIX),
        Stale::Prefix(POSTS_PREFIX),
    ]
}

/// GET /api/admin/pages - List all pages, newest first.
pub async fn list_pages(State(state): State<AppState>) -> ApiResult<Vec<Page>> {
    success(or_empty("list_pages", state.repo.list_pages().await))
}

/// GET /api/admin/pages/:id - Get a single page.
pub async fn get_page(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Page> {
    match state.repo.get_page(&id).await? {
        Some(page) => success(page),
        None => Err(AppError::NotFound(format!("Page {} not found", id))),
    }
}

/// POST /api/admin/pages - Create a new page.
pub async fn create_page(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PageRequest>,
) -> ApiResult<Page> {
    request.check()?;

    let page = state.repo.create_page(&request).await?;
    revalidate(&state, &navigation_stale()).await;

    success(page)
}

/// PUT /api/admin/pages/:id - Replace a page.
pub async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<PageRequest>,
) -> ApiResult<Page> {
    request.check()?;

    let page = state.repo.update_page(&id, &request).await?;
    revalidate(&state, &navigation_stale()).await;

    success(page)
}

/// DELETE /api/admin/pages/:id - Delete a page.
pub async fn delete_page(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.repo.delete_page(&id).await?;
    revalidate(&state, &navigation_stale()).await;

    success(())
}
