//! Post API endpoints.

use axum::extract::{Path, State};

use super::{revalidate, success, ApiJson, ApiResult};
use crate::auth::Reader;
use crate::cache::{post_route, Stale, HOME_ROUTE};
use crate::db::or_empty;
use crate::errors::AppError;
use crate::models::{CreatePostRequest, LikeStatus, Post, UpdatePostRequest};
use crate::validation::FormSchema;
use crate::AppState;

/// GET /api/admin/posts - List all posts, newest first.
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    success(or_empty("list_posts", state.repo.list_posts().await))
}

/// GET /api/admin/posts/:id - Get a single post.
pub async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Post> {
    match state.repo.get_post(&id).await? {
        Some(post) => success(post),
        None => Err(AppError::NotFound(format!("Post {} not found", id))),
    }
}

/// POST /api/admin/posts - Create a new post.
pub async fn create_post(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreatePostRequest>,
) -> ApiResult<Post> {
    request.check()?;

    let post = state.repo.create_post(&request).await?;

    revalidate(
        &state,
        &[
            Stale::Route(HOME_ROUTE.to_string()),
            Stale::Route(post_route(&post.slug)),
        ],
    )
    .await;

    success(post)
}

/// PUT /api/admin/posts/:id - Replace a post.
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdatePostRequest>,
) -> ApiResult<Post> {
    request.check()?;

    let previous = state
        .repo
        .get_post(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))?;

    let post = state.repo.update_post(&id, &request).await?;

    revalidate(
        &state,
        &[
            Stale::Route(HOME_ROUTE.to_string()),
            Stale::Route(post_route(&previous.slug)),
            Stale::Route(post_route(&post.slug)),
        ],
    )
    .await;

    success(post)
}

/// DELETE /api/admin/posts/:id - Delete a post.
pub async fn delete_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let slug = state.repo.delete_post(&id).await?;

    revalidate(
        &state,
        &[
            Stale::Route(HOME_ROUTE.to_string()),
            Stale::Route(post_route(&slug)),
        ],
    )
    .await;

    success(())
}

/// POST /api/posts/:id/like - Like a post as the signed-in reader.
pub async fn like_post(
    State(state): State<AppState>,
    Reader(identity): Reader,
    Path(id): Path<String>,
) -> ApiResult<LikeStatus> {
    let post = published_post(&state, &id).await?;
    let likes = state.repo.like_post(&post.id, &identity.id).await?;

    revalidate(
        &state,
        &[
            Stale::Route(HOME_ROUTE.to_string()),
            Stale::Route(post_route(&post.slug)),
        ],
    )
    .await;

    success(LikeStatus { post_id: id, likes })
}

/// DELETE /api/posts/:id/like - Withdraw the reader's like.
pub async fn unlike_post(
    State(state): State<AppState>,
    Reader(identity): Reader,
    Path(id): Path<String>,
) -> ApiResult<LikeStatus> {
    let post = published_post(&state, &id).await?;
    let likes = state.repo.unlike_post(&post.id, &identity.id).await?;

    revalidate(
        &state,
        &[
            Stale::Route(HOME_ROUTE.to_string()),
            Stale::Route(post_route(&post.slug)),
        ],
    )
    .await;

    success(LikeStatus { post_id: id, likes })
}

/// A post readers may interact with.
pub(crate) async fn published_post(state: &AppState, id: &str) -> Result<Post, AppError> {
    state
        .repo
        .get_post(id)
        .await?
        .filter(|p| p.published)
        .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))
}
