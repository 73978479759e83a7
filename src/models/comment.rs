//! Reader comments on posts.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A comment joined with its author's display name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub post_id: String,
    pub author_id: String,
    pub author_name: String,
    pub created_at: String,
}

/// Request body for creating or editing a comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "O comentário não pode estar vazio"))]
    pub content: String,
}
