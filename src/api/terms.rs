//! Category and tag API endpoints.
//!
//! Both collections share one set of operations parameterized by [`Taxonomy`].

use axum::extract::{Path, State};

use super::{revalidate, success, ApiJson, ApiResult};
use crate::cache::{Stale, HOME_ROUTE};
use crate::db::or_empty;
use crate::errors::AppError;
use crate::models::{Taxonomy, Term, TermRequest};
use crate::validation::FormSchema;
use crate::AppState;

/// Categories are listed in the home sidebar; tags appear in no cached view.
fn stale_views(taxonomy: Taxonomy) -> Vec<Stale> {
    match taxonomy {
        Taxonomy::Category => vec![Stale::Route(HOME_ROUTE.to_string())],
        Taxonomy::Tag => Vec::new(),
    }
}

async fn list_terms(state: &AppState, taxonomy: Taxonomy) -> ApiResult<Vec<Term>> {
    success(or_empty("list_terms", state.repo.list_terms(taxonomy).await))
}

async fn get_term(state: &AppState, taxonomy: Taxonomy, id: &str) -> ApiResult<Term> {
    match state.repo.get_term(taxonomy, id).await? {
        Some(term) => success(term),
        None => Err(AppError::NotFound(format!(
            "{} {} not found",
            taxonomy.label(),
            id
        ))),
    }
}

async fn create_term(state: &AppState, taxonomy: Taxonomy, request: TermRequest) -> ApiResult<Term> {
    request.check()?;

    let term = state.repo.create_term(taxonomy, &request).await?;
    revalidate(state, &stale_views(taxonomy)).await;

    success(term)
}

async fn update_term(
    state: &AppState,
    taxonomy: Taxonomy,
    id: &str,
    request: TermRequest,
) -> ApiResult<Term> {
    request.check()?;

    let term = state.repo.update_term(taxonomy, id, &request).await?;
    revalidate(state, &stale_views(taxonomy)).await;

    success(term)
}

async fn delete_term(state: &AppState, taxonomy: Taxonomy, id: &str) -> ApiResult<()> {
    state.repo.delete_term(taxonomy, id).await?;
    revalidate(state, &stale_views(taxonomy)).await;

    success(())
}

/// GET /api/admin/categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Term>> {
    list_terms(&state, Taxonomy::Category).await
}

/// GET /api/admin/categories/:id
pub async fn get_category(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Term> {
    get_term(&state, Taxonomy::Category, &id).await
}

/// POST /api/admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TermRequest>,
) -> ApiResult<Term> {
    create_term(&state, Taxonomy::Category, request).await
}

/// PUT /api/admin/categories/:id
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<TermRequest>,
) -> ApiResult<Term> {
    update_term(&state, Taxonomy::Category, &id, request).await
}

/// DELETE /api/admin/categories/:id
pub async fn delete_category(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    delete_term(&state, Taxonomy::Category, &id).await
}

/// GET /api/admin/tags
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Vec<Term>> {
    list_terms(&state, Taxonomy::Tag).await
}

/// GET /api/admin/tags/:id
pub async fn get_tag(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Term> {
    get_term(&state, Taxonomy::Tag, &id).await
}

/// POST /api/admin/tags
pub async fn create_tag(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TermRequest>,
) -> ApiResult<Term> {
    create_term(&state, Taxonomy::Tag, request).await
}

/// PUT /api/admin/tags/:id
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<TermRequest>,
) -> ApiResult<Term> {
    update_term(&state, Taxonomy::Tag, &id, request).await
}

/// DELETE /api/admin/tags/:id
pub async fn delete_tag(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    delete_term(&state, Taxonomy::Tag, &id).await
}
