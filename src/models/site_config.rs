//! Global site configuration: branding, palette, sidebar and footer.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Sidebar widgets and their headings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SidebarConfig {
    pub show_about: bool,
    pub about_title: String,
    pub about_content: String,
    pub show_categories: bool,
    pub categories_title: String,
    pub show_recent_posts: bool,
    pub recent_posts_title: String,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            show_about: true,
            about_title: "Sobre".to_string(),
            about_content: "Bem-vindo ao meu blog!".to_string(),
            show_categories: true,
            categories_title: "Categorias".to_string(),
            show_recent_posts: true,
            recent_posts_title: "Posts Recentes".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FooterLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FooterConfig {
    pub copyright: String,
    pub links: Vec<FooterLink>,
    pub show_social: bool,
    pub social_links: Vec<SocialLink>,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            copyright: String::new(),
            links: Vec::new(),
            show_social: true,
            social_links: Vec::new(),
        }
    }
}

/// The singleton site configuration.
///
/// [`SiteConfig::default`] is the only definition of the fallback value served
/// when the store has no record or cannot be read. Colors are opaque strings
/// produced by the color picker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(default)]
    #[validate(length(min = 1, message = "O título é obrigatório"))]
    pub title: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub show_logo: bool,
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub text_color: String,
    #[serde(default)]
    pub button_color: String,
    #[serde(default)]
    pub sidebar: SidebarConfig,
    #[serde(default)]
    pub footer: FooterConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Meu Blog".to_string(),
            logo: String::new(),
            show_logo: false,
            primary_color: "#0f172a".to_string(),
            background_color: "#ffffff".to_string(),
            text_color: "#0f172a".to_string(),
            button_color: "#2563eb".to_string(),
            sidebar: SidebarConfig::default(),
            footer: FooterConfig::default(),
        }
    }
}
