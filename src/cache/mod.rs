//! Route cache for composed views.
//!
//! Views are cached by route path. Write paths call [`RouteCache::revalidate`]
//! with the routes they made stale; the next request recomputes them. The cache
//! is a staleness hint only: a failed invalidation never fails a write.
//!
//! Every revalidation starts a new generation. A view computed on a miss is
//! only stored if no revalidation happened since the miss, so a view built
//! from reads that raced a write never outlives that write's invalidation.

use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

pub const HOME_ROUTE: &str = "/";
pub const POSTS_PREFIX: &str = "/posts/";
pub const PAGES_PREFIX: &str = "/pages/";

/// Route of a single post.
pub fn post_route(slug: &str) -> String {
    format!("{POSTS_PREFIX}{slug}")
}

/// Route of a single page.
pub fn page_route(slug: &str) -> String {
    format!("{PAGES_PREFIX}{slug}")
}

/// What a write made stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stale {
    /// One exact route.
    Route(String),
    /// Every route under a prefix.
    Prefix(&'static str),
    /// Everything.
    All,
}

impl Stale {
    fn matches(&self, route: &str) -> bool {
        match self {
            Stale::Route(r) => r == route,
            Stale::Prefix(prefix) => route.starts_with(prefix),
            Stale::All => true,
        }
    }
}

/// Generation of the cache observed on a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Outcome of a cache lookup.
#[derive(Debug)]
pub enum Cached<T> {
    Hit(T),
    /// Not cached; hand the generation back to [`RouteCache::put`].
    Miss(Generation),
}

#[derive(Default)]
struct Entries {
    views: HashMap<String, serde_json::Value>,
    generation: u64,
}

/// In-process cache of serialized views keyed by route.
#[derive(Default)]
pub struct RouteCache {
    entries: RwLock<Entries>,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached view for a route, or the generation to store a fresh one under.
    pub async fn get<T: DeserializeOwned>(&self, route: &str) -> Cached<T> {
        let entries = self.entries.read().await;
        match entries
            .views
            .get(route)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
        {
            Some(view) => Cached::Hit(view),
            None => Cached::Miss(Generation(entries.generation)),
        }
    }

    /// Store the view computed after a miss, unless a revalidation has run since.
    pub async fn put<T: Serialize>(&self, route: &str, seen: Generation, view: &T) {
        let value = match serde_json::to_value(view) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to cache view for {}: {}", route, e);
                return;
            }
        };

        let mut entries = self.entries.write().await;
        if entries.generation != seen.0 {
            tracing::debug!("Not caching {}: revalidated while it was computed", route);
            return;
        }
        entries.views.insert(route.to_string(), value);
    }

    /// Drop every cached route matched by `stale`.
    pub async fn revalidate(&self, stale: &[Stale]) {
        let mut entries = self.entries.write().await;
        for s in stale {
            tracing::debug!("Revalidating {:?}", s);
        }
        entries.generation += 1;
        entries
            .views
            .retain(|route, _| !stale.iter().any(|s| s.matches(route)));
    }

    #[cfg(test)]
    async fn contains(&self, route: &str) -> bool {
        self.entries.read().await.views.contains_key(route)
    }
}
