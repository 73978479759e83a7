//! User and session API endpoints.
//!
//! Operators provision readers and hand them session tokens; there is no
//! password flow.

use axum::extract::{Path, State};

use super::{success, ApiJson, ApiResult};
use crate::db::or_empty;
use crate::errors::AppError;
use crate::models::{CreateUserRequest, Session, User};
use crate::validation::FormSchema;
use crate::AppState;

/// GET /api/admin/users - List all users.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    success(or_empty("list_users", state.repo.list_users().await))
}

/// POST /api/admin/users - Create a user.
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> ApiResult<User> {
    request.check()?;
    success(state.repo.create_user(&request).await?)
}

/// POST /api/admin/users/:id/sessions - Issue a session token for a user.
pub async fn create_session(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Session> {
    if state.repo.get_user(&user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }

    success(state.repo.create_session(&user_id).await?)
}
