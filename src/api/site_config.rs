//! Site configuration API endpoints.

use axum::extract::State;

use super::{revalidate, success, ApiJson, ApiResult};
use crate::cache::Stale;
use crate::models::SiteConfig;
use crate::validation::FormSchema;
use crate::{site_config, AppState};

/// GET /api/site-config - The effective configuration, default when never saved.
pub async fn get_site_config(State(state): State<AppState>) -> ApiResult<SiteConfig> {
    success(site_config::resolve(&state.repo).await)
}

/// PUT /api/admin/site-config - Replace the configuration.
pub async fn update_site_config(
    State(state): State<AppState>,
    ApiJson(config): ApiJson<SiteConfig>,
) -> ApiResult<SiteConfig> {
    config.check()?;

    let saved = state.repo.save_site_config(&config).await?;

    // Every view embeds the configuration.
    revalidate(&state, &[Stale::All]).await;

    success(saved)
}
