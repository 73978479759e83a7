//! Post model and its write requests.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A blog post as persisted by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// Rich-text HTML as produced by the editor. Unsanitized.
    pub content: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub published: bool,
    pub views: i64,
    /// Maintained by the store from the `post_likes` rows.
    pub likes: i64,
    pub author_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// The subset of a post shown in listings and popularity widgets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub views: i64,
    pub likes: i64,
    pub created_at: String,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            cover_image: post.cover_image.clone(),
            views: post.views,
            likes: post.likes,
            created_at: post.created_at.clone(),
        }
    }
}

/// Request body for creating a new post.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "O título é obrigatório"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "O slug é obrigatório"))]
    pub slug: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "O conteúdo é obrigatório"))]
    pub content: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "O resumo é obrigatório"))]
    pub excerpt: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub published: bool,
    /// User ID of the author
    #[serde(default)]
    #[validate(length(min = 1, message = "O autor é obrigatório"))]
    pub author_id: String,
}

/// Request body for updating a post. Every field is replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "O título é obrigatório"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "O slug é obrigatório"))]
    pub slug: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "O conteúdo é obrigatório"))]
    pub content: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "O resumo é obrigatório"))]
    pub excerpt: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl From<&Post> for UpdatePostRequest {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            cover_image: post.cover_image.clone(),
            published: post.published,
        }
    }
}

/// Likes counter after a like or unlike.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub post_id: String,
    pub likes: i64,
}
