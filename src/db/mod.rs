//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all blog content. Ordering, filtering and
//! the likes counter are computed by the store, never by the application.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::errors::AppError;

/// Number of posts on the home page.
pub const HOME_RECENT_LIMIT: i64 = 10;
/// Number of posts in each popularity list.
pub const POPULAR_LIMIT: i64 = 5;

/// Degrade a failed list read to an empty list, logging the failure.
pub fn or_empty<T>(operation: &str, result: Result<Vec<T>, AppError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!("{} failed, serving an empty list: {}", operation, e);
        Vec::new()
    })
}

/// Degrade a failed single-record read to "absent", logging the failure.
pub fn or_missing<T>(operation: &str, result: Result<Option<T>, AppError>) -> Option<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!("{} failed, treating as not found: {}", operation, e);
        None
    })
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('admin', 'moderator', 'user')),
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE CHECK (slug <> ''),
            content TEXT NOT NULL,
            excerpt TEXT NOT NULL,
            cover_image TEXT,
            published INTEGER NOT NULL DEFAULT 0,
            views INTEGER NOT NULL DEFAULT 0,
            likes INTEGER NOT NULL DEFAULT 0,
            author_id TEXT NOT NULL REFERENCES users(id),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pages (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE CHECK (slug <> ''),
            content TEXT NOT NULL,
            allow_comments INTEGER NOT NULL DEFAULT 1,
            position TEXT NOT NULL DEFAULT 'footer' CHECK (position IN ('header', 'footer')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    for table in ["categories", "tags"] {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE CHECK (slug <> ''),
                created_at TEXT NOT NULL
            );
            "#
        ))
        .execute(pool)
        .await?;
    }

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS post_categories (
            post_id TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            category_id TEXT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
            PRIMARY KEY (post_id, category_id)
        );

        CREATE TABLE IF NOT EXISTS post_tags (
            post_id TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            tag_id TEXT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (post_id, tag_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            id TEXT PRIMARY KEY,
            content TEXT NOT NULL CHECK (content <> ''),
            post_id TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            author_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS post_likes (
            post_id TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            PRIMARY KEY (post_id, user_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // The likes counter is an aggregate of post_likes kept by the store.
    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS post_likes_count_insert
        AFTER INSERT ON post_likes
        BEGIN
            UPDATE posts
            SET likes = (SELECT COUNT(*) FROM post_likes WHERE post_id = NEW.post_id)
            WHERE id = NEW.post_id;
        END;
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS post_likes_count_delete
        AFTER DELETE ON post_likes
        BEGIN
            UPDATE posts
            SET likes = (SELECT COUNT(*) FROM post_likes WHERE post_id = OLD.post_id)
            WHERE id = OLD.post_id;
        END;
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS site_config (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            title TEXT NOT NULL,
            logo TEXT NOT NULL DEFAULT '',
            show_logo INTEGER NOT NULL DEFAULT 0,
            primary_color TEXT NOT NULL,
            background_color TEXT NOT NULL,
            text_color TEXT NOT NULL,
            button_color TEXT NOT NULL,
            sidebar TEXT NOT NULL,
            footer TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at);
        CREATE INDEX IF NOT EXISTS idx_posts_views ON posts(views);
        CREATE INDEX IF NOT EXISTS idx_posts_likes ON posts(likes);
        CREATE INDEX IF NOT EXISTS idx_pages_position ON pages(position);
        CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments(post_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
