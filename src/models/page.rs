//! Standalone page model.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Where a page's navigation link is rendered.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PagePosition {
    Header,
    #[default]
    Footer,
}

impl PagePosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            PagePosition::Header => "header",
            PagePosition::Footer => "footer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "header" => Some(PagePosition::Header),
            "footer" => Some(PagePosition::Footer),
            _ => None,
        }
    }
}

/// A standalone page linked from the header or the footer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub allow_comments: bool,
    pub position: PagePosition,
    pub created_at: String,
    pub updated_at: String,
}

/// Navigation entry for a page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageLink {
    pub title: String,
    pub slug: String,
}

impl From<&Page> for PageLink {
    fn from(page: &Page) -> Self {
        Self {
            title: page.title.clone(),
            slug: page.slug.clone(),
        }
    }
}

fn default_allow_comments() -> bool {
    true
}

/// Request body for creating or replacing a page.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "O título é obrigatório"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "O slug é obrigatório"))]
    pub slug: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "O conteúdo é obrigatório"))]
    pub content: String,
    #[serde(default = "default_allow_comments")]
    pub allow_comments: bool,
    #[serde(default)]
    pub position: PagePosition,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            content: String::new(),
            allow_comments: default_allow_comments(),
            position: PagePosition::default(),
        }
    }
}
