//! Form validation layer.
//!
//! Every write request is checked against its schema before any store call.
//! Failures are reported per field so the admin UI can show them inline.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::Validate;

use crate::errors::{AppError, FieldErrors};
use crate::models::{
    CommentRequest, CreatePostRequest, CreateUserRequest, PageRequest, SiteConfig, TermRequest,
    UpdatePostRequest,
};

static SLUG_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("slug format pattern is valid"));
static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_\s-]").expect("slug strip pattern is valid"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

const SLUG_FORMAT_MESSAGE: &str =
    "O slug deve conter apenas letras minúsculas, números, \"-\" ou \"_\"";

/// Derive a URL slug from a title.
///
/// Lower-cases, drops everything that is not an ASCII word character,
/// whitespace or hyphen, then joins the remaining words with `-`. No
/// uniqueness check is made; duplicates are rejected by the store.
pub fn generate_slug(title: &str) -> String {
    let lower = title.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lower, "");
    WHITESPACE_RUN
        .replace_all(stripped.trim(), "-")
        .into_owned()
}

/// Whether `slug` is already in canonical URL form.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_FORMAT.is_match(slug)
}

/// A write request with a validation schema.
pub trait FormSchema: Validate {
    /// The slug carried by the request, if the entity is slugged.
    fn slug(&self) -> Option<&str> {
        None
    }

    /// Run the schema, collecting every failing field.
    fn check(&self) -> Result<(), AppError> {
        let mut fields = FieldErrors::new();

        if let Err(errors) = self.validate() {
            for (field, errs) in errors.field_errors() {
                let messages = fields.entry(field.to_string()).or_default();
                for err in errs.iter() {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    messages.push(message);
                }
            }
        }

        if let Some(slug) = self.slug() {
            // Empty slugs are already reported by the schema.
            if !slug.is_empty() && !is_valid_slug(slug) {
                fields
                    .entry("slug".to_string())
                    .or_default()
                    .push(SLUG_FORMAT_MESSAGE.to_string());
            }
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(fields))
        }
    }
}

impl FormSchema for CreatePostRequest {
    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

impl FormSchema for UpdatePostRequest {
    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

impl FormSchema for PageRequest {
    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

impl FormSchema for TermRequest {
    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }
}

impl FormSchema for CommentRequest {}
impl FormSchema for CreateUserRequest {}
impl FormSchema for SiteConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields_of(err: AppError) -> FieldErrors {
        match err {
            AppError::Validation(fields) => fields,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_generate_slug_drops_accents_and_punctuation() {
        assert_eq!(generate_slug("Olá, Mundo! 123"), "ol-mundo-123");
        assert_eq!(generate_slug("Olá, Mundo! 123"), generate_slug("Olá, Mundo! 123"));
    }

    #[test]
    fn test_generate_slug_is_idempotent() {
        for title in ["Hello   World", "  Rust & Axum: a tour ", "já-existe_slug", ""] {
            let once = generate_slug(title);
            assert_eq!(generate_slug(&once), once);
            assert!(once.is_empty() || is_valid_slug(&once), "{once:?}");
        }
    }

    #[test]
    fn test_generate_slug_collapses_whitespace() {
        assert_eq!(generate_slug("Meu   primeiro\tpost"), "meu-primeiro-post");
        assert_eq!(generate_slug("  padded  "), "padded");
    }

    #[test]
    fn test_post_requires_every_text_field() {
        let fields = fields_of(CreatePostRequest::default().check().unwrap_err());
        for name in ["title", "slug", "content", "excerpt", "author_id"] {
            assert!(fields.contains_key(name), "missing {name}");
        }
        assert_eq!(fields["title"], vec!["O título é obrigatório".to_string()]);
    }

    #[test]
    fn test_malformed_slug_is_reported() {
        let request = TermRequest {
            name: "Notícias".to_string(),
            slug: "Notícias Locais".to_string(),
        };
        let fields = fields_of(request.check().unwrap_err());
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["slug"], vec![SLUG_FORMAT_MESSAGE.to_string()]);
    }

    #[test]
    fn test_valid_page_passes() {
        let request = PageRequest {
            title: "Sobre".to_string(),
            slug: "sobre".to_string(),
            content: "<p>Quem somos</p>".to_string(),
            ..PageRequest::default()
        };
        assert!(request.check().is_ok());
    }

    #[test]
    fn test_site_config_title_required() {
        let config = SiteConfig {
            title: String::new(),
            ..SiteConfig::default()
        };
        let fields = fields_of(config.check().unwrap_err());
        assert!(fields.contains_key("title"));
        assert!(SiteConfig::default().check().is_ok());
    }
}
