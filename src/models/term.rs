//! Categories and tags: named, slugged labels for posts.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Which label collection a term belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taxonomy {
    Category,
    Tag,
}

impl Taxonomy {
    pub fn table(&self) -> &'static str {
        match self {
            Taxonomy::Category => "categories",
            Taxonomy::Tag => "tags",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Taxonomy::Category => "Categoria",
            Taxonomy::Tag => "Tag",
        }
    }
}

/// A category or a tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub created_at: String,
}

/// Request body for creating or replacing a category or tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TermRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "O nome é obrigatório"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "O slug é obrigatório"))]
    pub slug: String,
}
