//! Blog Backend
//!
//! REST backend for a content-managed blog with SQLite persistence: posts,
//! pages, categories, tags, reader comments and likes, a singleton site
//! configuration, and composed views for the public site.

pub mod api;
pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod site_config;
pub mod validation;
pub mod views;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use cache::RouteCache;
use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub cache: Arc<RouteCache>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repo: Repository, config: Config) -> Self {
        Self {
            repo: Arc::new(repo),
            cache: Arc::new(RouteCache::new()),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // Operator routes
    let admin_routes = Router::new()
        // Posts
        .route("/posts", get(api::list_posts).post(api::create_post))
        .route(
            "/posts/{id}",
            get(api::get_post)
                .put(api::update_post)
                .delete(api::delete_post),
        )
        .route("/posts/{id}/comments", get(api::list_post_comments))
        // Pages
        .route("/pages", get(api::list_pages).post(api::create_page))
        .route(
            "/pages/{id}",
            get(api::get_page)
                .put(api::update_page)
                .delete(api::delete_page),
        )
        // Categories
        .route(
            "/categories",
            get(api::list_categories).post(api::create_category),
        )
        .route(
            "/categories/{id}",
            get(api::get_category)
                .put(api::update_category)
                .delete(api::delete_category),
        )
        // Tags
        .route("/tags", get(api::list_tags).post(api::create_tag))
        .route(
            "/tags/{id}",
            get(api::get_tag)
                .put(api::update_tag)
                .delete(api::delete_tag),
        )
        // Site configuration
        .route("/site-config", put(api::update_site_config))
        // Users and sessions
        .route("/users", get(api::list_users).post(api::create_user))
        .route("/users/{id}/sessions", post(api::create_session))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Reader and public routes; readers authenticate per handler
    let public_routes = Router::new()
        .route("/site-config", get(api::get_site_config))
        .route("/views/home", get(api::home_view))
        .route("/views/posts/{slug}", get(api::post_view))
        .route("/views/pages/{slug}", get(api::page_view))
        .route("/posts/{id}/comments", post(api::create_comment))
        .route(
            "/comments/{id}",
            put(api::update_comment).delete(api::delete_comment),
        )
        .route(
            "/posts/{id}/like",
            post(api::like_post).delete(api::unlike_post),
        );

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api/admin", admin_routes)
        .nest("/api", public_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
