//! Composed view endpoints for the public site.

use axum::extract::{Path, State};

use super::{success, ApiResult};
use crate::auth::Viewer;
use crate::views::{self, HomeView, PageView, PostView};
use crate::AppState;

/// GET /api/views/home
pub async fn home_view(State(state): State<AppState>) -> ApiResult<HomeView> {
    success(views::home(&state).await)
}

/// GET /api/views/posts/:slug
pub async fn post_view(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Path(slug): Path<String>,
) -> ApiResult<PostView> {
    success(views::post(&state, &slug, viewer).await?)
}

/// GET /api/views/pages/:slug
pub async fn page_view(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    Path(slug): Path<String>,
) -> ApiResult<PageView> {
    success(views::page(&state, &slug, viewer).await?)
}
