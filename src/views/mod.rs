//! View aggregation.
//!
//! Each public route is composed from the site configuration and a handful of
//! store reads. List reads degrade to empty lists and single-record reads
//! degrade to "not found"; neither ever fails the request on its own.
//! Stored rich text is sanitized here, before it reaches any renderer.

use serde::{Deserialize, Serialize};

use crate::cache::{page_route, post_route, Cached, HOME_ROUTE};
use crate::db::{or_empty, or_missing, Repository, HOME_RECENT_LIMIT, POPULAR_LIMIT};
use crate::errors::AppError;
use crate::models::{
    Comment, Identity, Page, PageLink, PagePosition, Post, PostSummary, SiteConfig, Taxonomy,
    Term,
};
use crate::{site_config, AppState};

/// Everything the home page renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub site_config: SiteConfig,
    pub recent_posts: Vec<PostSummary>,
    pub most_viewed: Vec<PostSummary>,
    pub most_liked: Vec<PostSummary>,
    /// Sidebar category list, by name.
    pub categories: Vec<Term>,
    pub header_pages: Vec<PageLink>,
    pub footer_pages: Vec<PageLink>,
}

/// Everything a single post renders. `post.content` is sanitized HTML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub site_config: SiteConfig,
    pub post: Post,
    pub comments: Vec<Comment>,
    pub header_pages: Vec<PageLink>,
    pub footer_pages: Vec<PageLink>,
    pub viewer: Option<Identity>,
}

/// Everything a standalone page renders. `page.content` is sanitized HTML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub site_config: SiteConfig,
    pub page: Page,
    pub header_pages: Vec<PageLink>,
    pub footer_pages: Vec<PageLink>,
    pub viewer: Option<Identity>,
}

/// Strip scripts, event handlers and other active content from stored HTML.
pub fn sanitize_html(html: &str) -> String {
    ammonia::clean(html)
}

/// Compose the home page.
pub async fn home(state: &AppState) -> HomeView {
    let generation = match state.cache.get::<HomeView>(HOME_ROUTE).await {
        Cached::Hit(view) => return view,
        Cached::Miss(generation) => generation,
    };

    let repo = &state.repo;
    let site_config = site_config::resolve(repo).await;
    let recent_posts = or_empty("recent_posts", repo.recent_posts(HOME_RECENT_LIMIT).await);
    let most_viewed = or_empty("most_viewed_posts", repo.most_viewed_posts(POPULAR_LIMIT).await);
    let most_liked = or_empty("most_liked_posts", repo.most_liked_posts(POPULAR_LIMIT).await);
    let categories = or_empty("list_terms", repo.list_terms(Taxonomy::Category).await);
    let (header_pages, footer_pages) = navigation(repo).await;

    let view = HomeView {
        site_config,
        recent_posts,
        most_viewed,
        most_liked,
        categories,
        header_pages,
        footer_pages,
    };
    state.cache.put(HOME_ROUTE, generation, &view).await;
    view
}

/// Compose a single published post and its comments.
pub async fn post(
    state: &AppState,
    slug: &str,
    viewer: Option<Identity>,
) -> Result<PostView, AppError> {
    let route = post_route(slug);

    let mut view = match state.cache.get::<PostView>(&route).await {
        Cached::Hit(view) => view,
        Cached::Miss(generation) => {
            let repo = &state.repo;
            let post = or_missing("get_post_by_slug", repo.get_post_by_slug(slug).await)
                .filter(|p| p.published)
                .ok_or_else(|| AppError::NotFound(format!("Post {} not found", slug)))?;

            let site_config = site_config::resolve(repo).await;
            let comments = or_empty("list_comments", repo.list_comments(&post.id).await);
            let (header_pages, footer_pages) = navigation(repo).await;

            let view = PostView {
                site_config,
                post: Post {
                    content: sanitize_html(&post.content),
                    ..post
                },
                comments,
                header_pages,
                footer_pages,
                viewer: None,
            };
            state.cache.put(&route, generation, &view).await;
            view
        }
    };

    // The cached copy keeps the count it was built with; serve the live one.
    match state.repo.record_view(&view.post.id).await {
        Ok(Some(views)) => view.post.views = views,
        Ok(None) => {}
        Err(e) => tracing::warn!("Failed to count view of post {}: {}", view.post.id, e),
    }

    view.viewer = viewer;
    Ok(view)
}

/// Compose a standalone page.
pub async fn page(
    state: &AppState,
    slug: &str,
    viewer: Option<Identity>,
) -> Result<PageView, AppError> {
    let route = page_route(slug);

    let mut view = match state.cache.get::<PageView>(&route).await {
        Cached::Hit(view) => view,
        Cached::Miss(generation) => {
            let repo = &state.repo;
            let page = or_missing("get_page_by_slug", repo.get_page_by_slug(slug).await)
                .ok_or_else(|| AppError::NotFound(format!("Page {} not found", slug)))?;

            let site_config = site_config::resolve(repo).await;
            let (header_pages, footer_pages) = navigation(repo).await;

            let view = PageView {
                site_config,
                page: Page {
                    content: sanitize_html(&page.content),
                    ..page
                },
                header_pages,
                footer_pages,
                viewer: None,
            };
            state.cache.put(&route, generation, &view).await;
            view
        }
    };

    view.viewer = viewer;
    Ok(view)
}

/// Header and footer navigation, split from a single page listing.
async fn navigation(repo: &Repository) -> (Vec<PageLink>, Vec<PageLink>) {
    let pages = or_empty("list_pages", repo.list_pages().await);
    split_by_position(&pages)
}

fn split_by_position(pages: &[Page]) -> (Vec<PageLink>, Vec<PageLink>) {
    let links = |position: PagePosition| {
        pages
            .iter()
            .filter(|p| p.position == position)
            .map(PageLink::from)
            .collect::<Vec<_>>()
    };
    (links(PagePosition::Header), links(PagePosition::Footer))
}
