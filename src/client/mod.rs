//! Typed client for the admin API.
//!
//! Every write is validated locally before a request is made, and the records
//! the admin is working on are kept in per-entity caches keyed by id. A cache
//! is refreshed by re-fetching the listing or by merging the record a write
//! returned, which lands where the server listing would place it. Deleting
//! drops the id only once the server has answered.

use std::cmp::Ordering;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::auth::API_KEY_HEADER;
use crate::errors::{AppError, ErrorResponse, FieldErrors};
use crate::models::{
    CreatePostRequest, CreateUserRequest, Page, PageRequest, Post, Session, SiteConfig, Taxonomy,
    Term, TermRequest, UpdatePostRequest, User,
};
use crate::validation::FormSchema;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),
    #[error("{code} ({status}): {message}")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
    },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// HTTP status of a server-side failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A record addressable by id, listed by the server in a fixed order.
pub trait Entity: Clone + DeserializeOwned {
    fn id(&self) -> &str;

    /// Where `self` sits relative to `other` in the server listing.
    fn listing_order(&self, other: &Self) -> Ordering;
}

impl Entity for Post {
    fn id(&self) -> &str {
        &self.id
    }

    // Newest first.
    fn listing_order(&self, other: &Self) -> Ordering {
        other.created_at.cmp(&self.created_at)
    }
}

impl Entity for Page {
    fn id(&self) -> &str {
        &self.id
    }

    // Newest first.
    fn listing_order(&self, other: &Self) -> Ordering {
        other.created_at.cmp(&self.created_at)
    }
}

impl Entity for Term {
    fn id(&self) -> &str {
        &self.id
    }

    fn listing_order(&self, other: &Self) -> Ordering {
        (&self.name, &self.created_at).cmp(&(&other.name, &other.created_at))
    }
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn listing_order(&self, other: &Self) -> Ordering {
        (&self.name, &self.created_at).cmp(&(&other.name, &other.created_at))
    }
}

/// Client-side copy of one entity listing, in server order.
#[derive(Debug, Clone)]
pub struct EntityCache<T> {
    items: Vec<T>,
}

impl<T> Default for EntityCache<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> EntityCache<T> {
    /// Replace the whole listing with a fresh fetch.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Merge a record returned by a write. Any previous copy is dropped and the
    /// record is placed where the server listing orders it, ahead of any equals.
    pub fn merge(&mut self, item: T) {
        self.remove(item.id());
        let index = self
            .items
            .partition_point(|i| i.listing_order(&item) == Ordering::Less);
        self.items.insert(index, item);
    }

    /// Drop a record. Unknown ids leave the listing untouched.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|i| i.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Deserialize)]
struct SuccessEnvelope<T> {
    data: T,
}

/// Admin API client with its working caches.
pub struct AdminClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    pub posts: EntityCache<Post>,
    pub pages: EntityCache<Page>,
    pub categories: EntityCache<Term>,
    pub tags: EntityCache<Term>,
    pub users: EntityCache<User>,
}

impl AdminClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            posts: EntityCache::default(),
            pages: EntityCache::default(),
            categories: EntityCache::default(),
            tags: EntityCache::default(),
            users: EntityCache::default(),
        }
    }

    // ==================== POSTS ====================

    pub async fn refresh_posts(&mut self) -> Result<&[Post], ClientError> {
        let posts = self.fetch("/api/admin/posts").await?;
        self.posts.replace_all(posts);
        Ok(self.posts.list())
    }

    pub async fn create_post(&mut self, form: &CreatePostRequest) -> Result<Post, ClientError> {
        validate(form)?;
        let post: Post = self.write(Method::POST, "/api/admin/posts", form).await?;
        self.posts.merge(post.clone());
        Ok(post)
    }

    pub async fn update_post(
        &mut self,
        id: &str,
        form: &UpdatePostRequest,
    ) -> Result<Post, ClientError> {
        validate(form)?;
        let post: Post = self
            .write(Method::PUT, &format!("/api/admin/posts/{id}"), form)
            .await?;
        self.posts.merge(post.clone());
        Ok(post)
    }

    pub async fn delete_post(&mut self, id: &str) -> Result<(), ClientError> {
        self.delete(&format!("/api/admin/posts/{id}")).await?;
        self.posts.remove(id);
        Ok(())
    }

    // ==================== PAGES ====================

    pub async fn refresh_pages(&mut self) -> Result<&[Page], ClientError> {
        let pages = self.fetch("/api/admin/pages").await?;
        self.pages.replace_all(pages);
        Ok(self.pages.list())
    }

    pub async fn create_page(&mut self, form: &PageRequest) -> Result<Page, ClientError> {
        validate(form)?;
        let page: Page = self.write(Method::POST, "/api/admin/pages", form).await?;
        self.pages.merge(page.clone());
        Ok(page)
    }

    pub async fn update_page(&mut self, id: &str, form: &PageRequest) -> Result<Page, ClientError> {
        validate(form)?;
        let page: Page = self
            .write(Method::PUT, &format!("/api/admin/pages/{id}"), form)
            .await?;
        self.pages.merge(page.clone());
        Ok(page)
    }

    pub async fn delete_page(&mut self, id: &str) -> Result<(), ClientError> {
        self.delete(&format!("/api/admin/pages/{id}")).await?;
        self.pages.remove(id);
        Ok(())
    }

    // ==================== CATEGORIES / TAGS ====================

    pub async fn refresh_terms(&mut self, taxonomy: Taxonomy) -> Result<&[Term], ClientError> {
        let terms = self.fetch(&format!("/api/admin/{}", taxonomy.table())).await?;
        let cache = self.terms_mut(taxonomy);
        cache.replace_all(terms);
        Ok(cache.list())
    }

    pub async fn create_term(
        &mut self,
        taxonomy: Taxonomy,
        form: &TermRequest,
    ) -> Result<Term, ClientError> {
        validate(form)?;
        let term: Term = self
            .write(Method::POST, &format!("/api/admin/{}", taxonomy.table()), form)
            .await?;
        self.terms_mut(taxonomy).merge(term.clone());
        Ok(term)
    }

    pub async fn update_term(
        &mut self,
        taxonomy: Taxonomy,
        id: &str,
        form: &TermRequest,
    ) -> Result<Term, ClientError> {
        validate(form)?;
        let term: Term = self
            .write(
                Method::PUT,
                &format!("/api/admin/{}/{id}", taxonomy.table()),
                form,
            )
            .await?;
        self.terms_mut(taxonomy).merge(term.clone());
        Ok(term)
    }

    pub async fn delete_term(&mut self, taxonomy: Taxonomy, id: &str) -> Result<(), ClientError> {
        self.delete(&format!("/api/admin/{}/{id}", taxonomy.table()))
            .await?;
        self.terms_mut(taxonomy).remove(id);
        Ok(())
    }

    fn terms_mut(&mut self, taxonomy: Taxonomy) -> &mut EntityCache<Term> {
        match taxonomy {
            Taxonomy::Category => &mut self.categories,
            Taxonomy::Tag => &mut self.tags,
        }
    }

    // ==================== SITE CONFIG ====================

    pub async fn site_config(&self) -> Result<SiteConfig, ClientError> {
        self.fetch("/api/site-config").await
    }

    pub async fn update_site_config(&self, config: &SiteConfig) -> Result<SiteConfig, ClientError> {
        validate(config)?;
        self.write(Method::PUT, "/api/admin/site-config", config)
            .await
    }

    // ==================== USERS ====================

    pub async fn refresh_users(&mut self) -> Result<&[User], ClientError> {
        let users = self.fetch("/api/admin/users").await?;
        self.users.replace_all(users);
        Ok(self.users.list())
    }

    pub async fn create_user(&mut self, form: &CreateUserRequest) -> Result<User, ClientError> {
        validate(form)?;
        let user: User = self.write(Method::POST, "/api/admin/users", form).await?;
        self.users.merge(user.clone());
        Ok(user)
    }

    pub async fn create_session(&self, user_id: &str) -> Result<Session, ClientError> {
        let request = self.request(Method::POST, &format!("/api/admin/users/{user_id}/sessions"));
        self.send(request).await
    }

    // ==================== TRANSPORT ====================

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn write<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.request(method, path).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, path)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            let envelope: SuccessEnvelope<T> = serde_json::from_slice(&body)
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
            return Ok(envelope.data);
        }

        match serde_json::from_slice::<ErrorResponse>(&body) {
            Ok(envelope) => {
                tracing::warn!(
                    "Admin request failed with {}: {}",
                    status,
                    envelope.error.code
                );
                Err(ClientError::Api {
                    status,
                    code: envelope.error.code,
                    message: envelope.error.message,
                })
            }
            Err(_) => Err(ClientError::InvalidResponse(format!(
                "{}: {}",
                status,
                String::from_utf8_lossy(&body)
            ))),
        }
    }
}

/// Run a form's schema locally; failures never reach the network.
fn validate<F: FormSchema>(form: &F) -> Result<(), ClientError> {
    match form.check() {
        Ok(()) => Ok(()),
        Err(AppError::Validation(fields)) => Err(ClientError::Validation(fields)),
        Err(other) => Err(ClientError::InvalidResponse(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(id: &str, name: &str) -> Term {
        Term {
            id: id.to_string(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_merge_keeps_name_order() {
        let mut cache = EntityCache::default();
        cache.replace_all(vec![term("a", "Go"), term("b", "Rust")]);

        cache.merge(term("c", "Zig"));
        cache.merge(term("d", "C"));
        // A rename moves the term to its new place, exactly once.
        cache.merge(term("b", "Assembly"));

        let names: Vec<_> = cache.list().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Assembly", "C", "Go", "Zig"]);
    }

    #[test]
    fn test_merge_puts_newer_posts_first() {
        let post = |id: &str, created_at: &str| Post {
            id: id.to_string(),
            title: id.to_string(),
            slug: id.to_string(),
            content: String::new(),
            excerpt: String::new(),
            cover_image: None,
            published: true,
            views: 0,
            likes: 0,
            author_id: "u".to_string(),
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
        };

        let mut cache = EntityCache::default();
        cache.replace_all(vec![post("b", "2024-02-01"), post("a", "2024-01-01")]);
        cache.merge(post("c", "2024-03-01"));
        cache.merge(post("a", "2024-01-01"));

        let ids: Vec<_> = cache.list().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "a"]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut cache = EntityCache::default();
        cache.replace_all(vec![term("a", "Rust")]);

        assert!(cache.remove("missing").is_none());
        assert_eq!(cache.len(), 1);
        assert!(cache.remove("a").is_some());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_validate_maps_field_errors() {
        let form = TermRequest {
            name: String::new(),
            slug: "Com Espaço".to_string(),
        };
        match validate(&form) {
            Err(ClientError::Validation(fields)) => {
                assert!(fields.contains_key("name"));
                assert!(fields.contains_key("slug"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }
}
