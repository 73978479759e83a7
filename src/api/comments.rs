//! Comment API endpoints.
//!
//! Readers comment under their own session; editing and removal is open to the
//! author and to moderators.

use axum::extract::{Path, State};

use super::posts::published_post;
use super::{revalidate, success, ApiJson, ApiResult};
use crate::auth::Reader;
use crate::cache::{post_route, Stale};
use crate::db::or_empty;
use crate::errors::AppError;
use crate::models::{Comment, CommentRequest, Identity};
use crate::validation::FormSchema;
use crate::AppState;

const FORBIDDEN_MESSAGE: &str = "Você não tem permissão para alterar este comentário.";

/// GET /api/admin/posts/:id/comments - Comments of a post, newest first.
pub async fn list_post_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Vec<Comment>> {
    success(or_empty("list_comments", state.repo.list_comments(&post_id).await))
}

/// POST /api/posts/:id/comments - Comment on a published post.
pub async fn create_comment(
    State(state): State<AppState>,
    Reader(identity): Reader,
    Path(post_id): Path<String>,
    ApiJson(request): ApiJson<CommentRequest>,
) -> ApiResult<Comment> {
    request.check()?;

    let post = published_post(&state, &post_id).await?;
    let comment = state
        .repo
        .create_comment(&post.id, &identity.id, &request)
        .await?;

    revalidate(&state, &[Stale::Route(post_route(&post.slug))]).await;

    success(comment)
}

/// PUT /api/comments/:id - Edit a comment.
pub async fn update_comment(
    State(state): State<AppState>,
    Reader(identity): Reader,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<CommentRequest>,
) -> ApiResult<Comment> {
    request.check()?;

    let existing = managed_comment(&state, &identity, &id).await?;
    let comment = state.repo.update_comment(&existing.id, &request).await?;

    revalidate_post_of(&state, &comment).await;

    success(comment)
}

/// DELETE /api/comments/:id - Remove a comment.
pub async fn delete_comment(
    State(state): State<AppState>,
    Reader(identity): Reader,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let existing = managed_comment(&state, &identity, &id).await?;
    state.repo.delete_comment(&existing.id).await?;

    revalidate_post_of(&state, &existing).await;

    success(())
}

/// Fetch a comment the caller is allowed to edit or remove.
async fn managed_comment(
    state: &AppState,
    identity: &Identity,
    id: &str,
) -> Result<Comment, AppError> {
    let comment = state
        .repo
        .get_comment(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", id)))?;

    if !identity.can_manage_comment(&comment.author_id) {
        tracing::warn!(
            "User {} denied access to comment {} by {}",
            identity.id,
            comment.id,
            comment.author_id
        );
        return Err(AppError::Forbidden(FORBIDDEN_MESSAGE.to_string()));
    }

    Ok(comment)
}

async fn revalidate_post_of(state: &AppState, comment: &Comment) {
    match state.repo.get_post(&comment.post_id).await {
        Ok(Some(post)) => revalidate(state, &[Stale::Route(post_route(&post.slug))]).await,
        Ok(None) => {}
        Err(e) => tracing::warn!("Could not revalidate post {}: {}", comment.post_id, e),
    }
}
