//! Database repository for CRUD operations.
//!
//! Every write is a single statement; there are no multi-entity transactions.
//! Concurrent updates are last-write-wins.

use chrono::{SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    Comment, CommentRequest, CreatePostRequest, CreateUserRequest, FooterConfig, Identity, Page,
    PagePosition, PageRequest, Post, PostSummary, Role, Session, SidebarConfig, SiteConfig,
    Taxonomy, Term, TermRequest, UpdatePostRequest, User,
};

const POST_COLUMNS: &str = "id, title, slug, content, excerpt, cover_image, published, views, likes, author_id, created_at, updated_at";
const SUMMARY_COLUMNS: &str = "id, title, slug, excerpt, cover_image, views, likes, created_at";
const PAGE_COLUMNS: &str =
    "id, title, slug, content, allow_comments, position, created_at, updated_at";
const COMMENT_SELECT: &str = "SELECT c.id, c.content, c.post_id, c.author_id, u.name AS author_name, c.created_at FROM comments c JOIN users u ON u.id = c.author_id";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== POST OPERATIONS ====================

    /// List all posts, newest first. Used by the admin listing.
    pub async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    /// Most recent published posts, newest first.
    pub async fn recent_posts(&self, limit: i64) -> Result<Vec<PostSummary>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM posts WHERE published = 1 ORDER BY created_at DESC, rowid DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(summary_from_row).collect())
    }

    /// Published posts with the highest view counts.
    pub async fn most_viewed_posts(&self, limit: i64) -> Result<Vec<PostSummary>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM posts WHERE published = 1 ORDER BY views DESC, created_at DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(summary_from_row).collect())
    }

    /// Published posts with the most likes.
    pub async fn most_liked_posts(&self, limit: i64) -> Result<Vec<PostSummary>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM posts WHERE published = 1 ORDER BY likes DESC, created_at DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(summary_from_row).collect())
    }

    /// Get a post by ID.
    pub async fn get_post(&self, id: &str) -> Result<Option<Post>, AppError> {
        let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(post_from_row))
    }

    /// Get a post by slug.
    pub async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, AppError> {
        let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = ?"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(post_from_row))
    }

    /// Create a new post.
    #[tracing::instrument(name = "create_post", skip_all, fields(slug = %request.slug))]
    pub async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = timestamp();

        sqlx::query(
            "INSERT INTO posts (id, title, slug, content, excerpt, cover_image, published, views, likes, author_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, 0, 0, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&request.title)
        .bind(&request.slug)
        .bind(&request.content)
        .bind(&request.excerpt)
        .bind(non_empty(&request.cover_image))
        .bind(request.published as i32)
        .bind(&request.author_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_post(&id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Post {} vanished after insert", id)))
    }

    /// Replace every editable field of a post.
    #[tracing::instrument(name = "update_post", skip(self, request))]
    pub async fn update_post(&self, id: &str, request: &UpdatePostRequest) -> Result<Post, AppError> {
        let now = timestamp();

        let result = sqlx::query(
            "UPDATE posts SET title = ?, slug = ?, content = ?, excerpt = ?, cover_image = ?, published = ?, updated_at = ? WHERE id = ?"
        )
        .bind(&request.title)
        .bind(&request.slug)
        .bind(&request.content)
        .bind(&request.excerpt)
        .bind(non_empty(&request.cover_image))
        .bind(request.published as i32)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post {} not found", id)));
        }

        self.get_post(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))
    }

    /// Delete a post, returning the slug it was published under.
    #[tracing::instrument(name = "delete_post", skip(self))]
    pub async fn delete_post(&self, id: &str) -> Result<String, AppError> {
        let row = sqlx::query("DELETE FROM posts WHERE id = ? RETURNING slug")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.get::<String, _>("slug"))
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", id)))
    }

    /// Count one view of a post, returning the new total.
    pub async fn record_view(&self, id: &str) -> Result<Option<i64>, AppError> {
        let row = sqlx::query("UPDATE posts SET views = views + 1 WHERE id = ? RETURNING views")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get::<i64, _>("views")))
    }

    // ==================== LIKE OPERATIONS ====================

    /// Like a post. Liking twice keeps a single row.
    ///
    /// Returns the likes counter as aggregated by the store.
    #[tracing::instrument(name = "like_post", skip(self))]
    pub async fn like_post(&self, post_id: &str, user_id: &str) -> Result<i64, AppError> {
        sqlx::query(
            "INSERT INTO post_likes (post_id, user_id, created_at) VALUES (?, ?, ?) ON CONFLICT(post_id, user_id) DO NOTHING"
        )
        .bind(post_id)
        .bind(user_id)
        .bind(timestamp())
        .execute(&self.pool)
        .await?;

        self.likes_of(post_id).await
    }

    /// Remove a like. Removing an absent like is not an error.
    #[tracing::instrument(name = "unlike_post", skip(self))]
    pub async fn unlike_post(&self, post_id: &str, user_id: &str) -> Result<i64, AppError> {
        sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        self.likes_of(post_id).await
    }

    /// Number of like rows for a post.
    #[cfg(test)]
    async fn count_likes(&self, post_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM post_likes WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("total"))
    }

    async fn likes_of(&self, post_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT likes FROM posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.get::<i64, _>("likes"))
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))
    }

    // ==================== PAGE OPERATIONS ====================

    /// List all pages, newest first.
    pub async fn list_pages(&self) -> Result<Vec<Page>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {PAGE_COLUMNS} FROM pages ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(page_from_row).collect())
    }

    /// Get a page by ID.
    pub async fn get_page(&self, id: &str) -> Result<Option<Page>, AppError> {
        let row = sqlx::query(&format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(page_from_row))
    }

    /// Get a page by slug.
    pub async fn get_page_by_slug(&self, slug: &str) -> Result<Option<Page>, AppError> {
        let row = sqlx::query(&format!("SELECT {PAGE_COLUMNS} FROM pages WHERE slug = ?"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(page_from_row))
    }

    /// Create a new page.
    #[tracing::instrument(name = "create_page", skip_all, fields(slug = %request.slug))]
    pub async fn create_page(&self, request: &PageRequest) -> Result<Page, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = timestamp();

        sqlx::query(
            "INSERT INTO pages (id, title, slug, content, allow_comments, position, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&request.title)
        .bind(&request.slug)
        .bind(&request.content)
        .bind(request.allow_comments as i32)
        .bind(request.position.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Page {
            id,
            title: request.title.clone(),
            slug: request.slug.clone(),
            content: request.content.clone(),
            allow_comments: request.allow_comments,
            position: request.position,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Replace every field of a page.
    #[tracing::instrument(name = "update_page", skip(self, request))]
    pub async fn update_page(&self, id: &str, request: &PageRequest) -> Result<Page, AppError> {
        let now = timestamp();

        let result = sqlx::query(
            "UPDATE pages SET title = ?, slug = ?, content = ?, allow_comments = ?, position = ?, updated_at = ? WHERE id = ?"
        )
        .bind(&request.title)
        .bind(&request.slug)
        .bind(&request.content)
        .bind(request.allow_comments as i32)
        .bind(request.position.as_str())
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Page {} not found", id)));
        }

        self.get_page(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Page {} not found", id)))
    }

    /// Delete a page, returning its slug.
    #[tracing::instrument(name = "delete_page", skip(self))]
    pub async fn delete_page(&self, id: &str) -> Result<String, AppError> {
        let row = sqlx::query("DELETE FROM pages WHERE id = ? RETURNING slug")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.get::<String, _>("slug"))
            .ok_or_else(|| AppError::NotFound(format!("Page {} not found", id)))
    }

    // ==================== CATEGORY / TAG OPERATIONS ====================

    /// List all terms of a taxonomy, by name.
    pub async fn list_terms(&self, taxonomy: Taxonomy) -> Result<Vec<Term>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT id, name, slug, created_at FROM {} ORDER BY name, created_at, rowid",
            taxonomy.table()
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(term_from_row).collect())
    }

    /// Get a term by ID.
    pub async fn get_term(&self, taxonomy: Taxonomy, id: &str) -> Result<Option<Term>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT id, name, slug, created_at FROM {} WHERE id = ?",
            taxonomy.table()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(term_from_row))
    }

    /// Create a new category or tag.
    #[tracing::instrument(name = "create_term", skip(self, request), fields(slug = %request.slug))]
    pub async fn create_term(
        &self,
        taxonomy: Taxonomy,
        request: &TermRequest,
    ) -> Result<Term, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = timestamp();

        sqlx::query(&format!(
            "INSERT INTO {} (id, name, slug, created_at) VALUES (?, ?, ?, ?)",
            taxonomy.table()
        ))
        .bind(&id)
        .bind(&request.name)
        .bind(&request.slug)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Term {
            id,
            name: request.name.clone(),
            slug: request.slug.clone(),
            created_at: now,
        })
    }

    /// Replace the name and slug of a category or tag.
    #[tracing::instrument(name = "update_term", skip(self, request))]
    pub async fn update_term(
        &self,
        taxonomy: Taxonomy,
        id: &str,
        request: &TermRequest,
    ) -> Result<Term, AppError> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET name = ?, slug = ? WHERE id = ?",
            taxonomy.table()
        ))
        .bind(&request.name)
        .bind(&request.slug)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "{} {} not found",
                taxonomy.label(),
                id
            )));
        }

        self.get_term(taxonomy, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", taxonomy.label(), id)))
    }

    /// Delete a category or tag.
    #[tracing::instrument(name = "delete_term", skip(self))]
    pub async fn delete_term(&self, taxonomy: Taxonomy, id: &str) -> Result<(), AppError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", taxonomy.table()))
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "{} {} not found",
                taxonomy.label(),
                id
            )));
        }

        Ok(())
    }

    // ==================== COMMENT OPERATIONS ====================

    /// Comments of a post, newest first, with the author's name.
    pub async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, AppError> {
        let rows = sqlx::query(&format!(
            "{COMMENT_SELECT} WHERE c.post_id = ? ORDER BY c.created_at DESC, c.rowid DESC"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(comment_from_row).collect())
    }

    /// Get a comment by ID.
    pub async fn get_comment(&self, id: &str) -> Result<Option<Comment>, AppError> {
        let row = sqlx::query(&format!("{COMMENT_SELECT} WHERE c.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(comment_from_row))
    }

    /// Create a comment authored by `author_id`.
    #[tracing::instrument(name = "create_comment", skip(self, request))]
    pub async fn create_comment(
        &self,
        post_id: &str,
        author_id: &str,
        request: &CommentRequest,
    ) -> Result<Comment, AppError> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO comments (id, content, post_id, author_id, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&request.content)
        .bind(post_id)
        .bind(author_id)
        .bind(timestamp())
        .execute(&self.pool)
        .await?;

        self.get_comment(&id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Comment {} vanished after insert", id)))
    }

    /// Replace the content of a comment.
    #[tracing::instrument(name = "update_comment", skip(self, request))]
    pub async fn update_comment(
        &self,
        id: &str,
        request: &CommentRequest,
    ) -> Result<Comment, AppError> {
        let result = sqlx::query("UPDATE comments SET content = ? WHERE id = ?")
            .bind(&request.content)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment {} not found", id)));
        }

        self.get_comment(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", id)))
    }

    /// Delete a comment.
    #[tracing::instrument(name = "delete_comment", skip(self))]
    pub async fn delete_comment(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment {} not found", id)));
        }

        Ok(())
    }

    // ==================== SITE CONFIG OPERATIONS ====================

    /// Fetch the stored site configuration, if one was ever saved.
    pub async fn get_site_config(&self) -> Result<Option<SiteConfig>, AppError> {
        let row = sqlx::query(
            "SELECT title, logo, show_logo, primary_color, background_color, text_color, button_color, sidebar, footer FROM site_config WHERE id = 1"
        )
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(site_config_from_row).transpose()
    }

    /// Store the site configuration, replacing the previous one.
    #[tracing::instrument(name = "save_site_config", skip_all)]
    pub async fn save_site_config(&self, config: &SiteConfig) -> Result<SiteConfig, AppError> {
        let sidebar = serde_json::to_string(&config.sidebar)?;
        let footer = serde_json::to_string(&config.footer)?;

        sqlx::query(
            r#"
            INSERT INTO site_config (id, title, logo, show_logo, primary_color, background_color, text_color, button_color, sidebar, footer, updated_at)
            VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                logo = excluded.logo,
                show_logo = excluded.show_logo,
                primary_color = excluded.primary_color,
                background_color = excluded.background_color,
                text_color = excluded.text_color,
                button_color = excluded.button_color,
                sidebar = excluded.sidebar,
                footer = excluded.footer,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&config.title)
        .bind(&config.logo)
        .bind(config.show_logo as i32)
        .bind(&config.primary_color)
        .bind(&config.background_color)
        .bind(&config.text_color)
        .bind(&config.button_color)
        .bind(&sidebar)
        .bind(&footer)
        .bind(timestamp())
        .execute(&self.pool)
        .await?;

        Ok(config.clone())
    }

    // ==================== USER / SESSION OPERATIONS ====================

    /// List all users, by name.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query("SELECT id, name, role, created_at FROM users ORDER BY name, created_at, rowid")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT id, name, role, created_at FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Create a user.
    #[tracing::instrument(name = "create_user", skip_all)]
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = timestamp();

        sqlx::query("INSERT INTO users (id, name, role, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&request.name)
            .bind(request.role.as_str())
            .bind(&now)
            .execute(&self.pool)
            .await?;

        Ok(User {
            id,
            name: request.name.clone(),
            role: request.role,
            created_at: now,
        })
    }

    /// Issue a new session token for a user.
    #[tracing::instrument(name = "create_session", skip(self))]
    pub async fn create_session(&self, user_id: &str) -> Result<Session, AppError> {
        let token = uuid::Uuid::new_v4().to_string();
        let now = timestamp();

        sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(user_id)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        Ok(Session {
            token,
            user_id: user_id.to_string(),
            created_at: now,
        })
    }

    /// Resolve a session token to the user holding it.
    pub async fn identity_for_token(&self, token: &str) -> Result<Option<Identity>, AppError> {
        let row = sqlx::query(
            "SELECT u.id, u.name, u.role FROM sessions s JOIN users u ON u.id = s.user_id WHERE s.token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| {
            let role: String = row.get("role");
            Identity {
                id: row.get("id"),
                name: row.get("name"),
                role: Role::parse(&role).unwrap_or_default(),
            }
        }))
    }
}

/// Current time as a fixed-width RFC 3339 string, so text order is time order.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Blank optional strings are stored as NULL.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn post_from_row(row: &sqlx::sqlite::SqliteRow) -> Post {
    let published: i32 = row.get("published");
    Post {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        content: row.get("content"),
        excerpt: row.get("excerpt"),
        cover_image: row.get("cover_image"),
        published: published != 0,
        views: row.get("views"),
        likes: row.get("likes"),
        author_id: row.get("author_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn summary_from_row(row: &sqlx::sqlite::SqliteRow) -> PostSummary {
    PostSummary {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        excerpt: row.get("excerpt"),
        cover_image: row.get("cover_image"),
        views: row.get("views"),
        likes: row.get("likes"),
        created_at: row.get("created_at"),
    }
}

fn page_from_row(row: &sqlx::sqlite::SqliteRow) -> Page {
    let allow_comments: i32 = row.get("allow_comments");
    let position: String = row.get("position");
    Page {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        content: row.get("content"),
        allow_comments: allow_comments != 0,
        position: PagePosition::parse(&position).unwrap_or_default(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn term_from_row(row: &sqlx::sqlite::SqliteRow) -> Term {
    Term {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        created_at: row.get("created_at"),
    }
}

fn comment_from_row(row: &sqlx::sqlite::SqliteRow) -> Comment {
    Comment {
        id: row.get("id"),
        content: row.get("content"),
        post_id: row.get("post_id"),
        author_id: row.get("author_id"),
        author_name: row.get("author_name"),
        created_at: row.get("created_at"),
    }
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    let role: String = row.get("role");
    User {
        id: row.get("id"),
        name: row.get("name"),
        role: Role::parse(&role).unwrap_or_default(),
        created_at: row.get("created_at"),
    }
}

fn site_config_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SiteConfig, AppError> {
    let show_logo: i32 = row.get("show_logo");
    let sidebar: String = row.get("sidebar");
    let footer: String = row.get("footer");
    Ok(SiteConfig {
        title: row.get("title"),
        logo: row.get("logo"),
        show_logo: show_logo != 0,
        primary_color: row.get("primary_color"),
        background_color: row.get("background_color"),
        text_color: row.get("text_color"),
        button_color: row.get("button_color"),
        sidebar: serde_json::from_str::<SidebarConfig>(&sidebar)?,
        footer: serde_json::from_str::<FooterConfig>(&footer)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    async fn repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("repo.sqlite"))
            .await
            .expect("Failed to init DB");
        (Repository::new(pool), temp_dir)
    }

    async fn author(repo: &Repository) -> User {
        repo.create_user(&CreateUserRequest {
            name: "Autora".to_string(),
            role: Role::Admin,
        })
        .await
        .unwrap()
    }

    fn post_request(author_id: &str, slug: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: format!("Post {slug}"),
            slug: slug.to_string(),
            content: "<p>corpo</p>".to_string(),
            excerpt: "resumo".to_string(),
            cover_image: Some("   ".to_string()),
            published: true,
            author_id: author_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_like_is_upsert_and_counter_is_store_side() {
        let (repo, _dir) = repo().await;
        let user = author(&repo).await;
        let post = repo.create_post(&post_request(&user.id, "um")).await.unwrap();

        assert_eq!(repo.like_post(&post.id, &user.id).await.unwrap(), 1);
        assert_eq!(repo.like_post(&post.id, &user.id).await.unwrap(), 1);
        assert_eq!(repo.count_likes(&post.id).await.unwrap(), 1);

        assert_eq!(repo.unlike_post(&post.id, &user.id).await.unwrap(), 0);
        assert_eq!(repo.unlike_post(&post.id, &user.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let (repo, _dir) = repo().await;
        let user = author(&repo).await;
        repo.create_post(&post_request(&user.id, "repetido")).await.unwrap();

        let err = repo
            .create_post(&post_request(&user.id, "repetido"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_blank_cover_image_is_stored_as_none() {
        let (repo, _dir) = repo().await;
        let user = author(&repo).await;
        let post = repo.create_post(&post_request(&user.id, "capa")).await.unwrap();
        assert_eq!(post.cover_image, None);
        assert_eq!(post.views, 0);
        assert_eq!(post.likes, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let (repo, _dir) = repo().await;
        let err = repo.delete_post("nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_site_config_round_trips_through_store() {
        let (repo, _dir) = repo().await;
        assert!(repo.get_site_config().await.unwrap().is_none());

        let mut config = SiteConfig::default();
        config.title = "Diário".to_string();
        config.footer.copyright = "© 2026".to_string();
        repo.save_site_config(&config).await.unwrap();

        config.show_logo = true;
        repo.save_site_config(&config).await.unwrap();

        assert_eq!(repo.get_site_config().await.unwrap(), Some(config));
    }

    #[tokio::test]
    async fn test_comments_join_author_name_newest_first() {
        let (repo, _dir) = repo().await;
        let user = author(&repo).await;
        let post = repo.create_post(&post_request(&user.id, "c")).await.unwrap();

        for text in ["primeiro", "segundo"] {
            repo.create_comment(
                &post.id,
                &user.id,
                &CommentRequest {
                    content: text.to_string(),
                },
            )
            .await
            .unwrap();
        }

        let comments = repo.list_comments(&post.id).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "segundo");
        assert_eq!(comments[0].author_name, "Autora");
    }

    #[tokio::test]
    async fn test_session_resolves_identity() {
        let (repo, _dir) = repo().await;
        let user = author(&repo).await;
        let session = repo.create_session(&user.id).await.unwrap();

        let identity = repo.identity_for_token(&session.token).await.unwrap().unwrap();
        assert_eq!(identity.id, user.id);
        assert_eq!(identity.role, Role::Admin);
        assert!(repo.identity_for_token("bogus").await.unwrap().is_none());
    }
}
