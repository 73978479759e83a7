//! Site configuration resolver.
//!
//! The configuration is a single stored record. Readers never see a failure:
//! when nothing was saved yet, or the store cannot be read, the default
//! configuration is served instead.

use crate::db::Repository;
use crate::models::SiteConfig;

/// Load the site configuration, falling back to [`SiteConfig::default`].
pub async fn resolve(repo: &Repository) -> SiteConfig {
    match repo.get_site_config().await {
        Ok(Some(config)) => config,
        Ok(None) => SiteConfig::default(),
        Err(e) => {
            tracing::warn!("Failed to load site config, serving default: {}", e);
            SiteConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_empty_and_failing_store_serve_identical_default() {
        let temp_dir = TempDir::new().unwrap();

        let pool = init_database(&temp_dir.path().join("empty.sqlite"))
            .await
            .unwrap();
        let from_empty = resolve(&Repository::new(pool)).await;

        let broken = init_database(&temp_dir.path().join("broken.sqlite"))
            .await
            .unwrap();
        broken.close().await;
        let from_error = resolve(&Repository::new(broken)).await;

        assert_eq!(
            serde_json::to_vec(&from_empty).unwrap(),
            serde_json::to_vec(&from_error).unwrap()
        );
        assert_eq!(from_empty.title, "Meu Blog");
        assert!(!from_empty.show_logo);
        assert!(from_empty.footer.links.is_empty());
    }

    #[tokio::test]
    async fn test_saved_config_wins_over_default() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("saved.sqlite"))
            .await
            .unwrap();
        let repo = Repository::new(pool);

        let config = SiteConfig {
            title: "Caderno".to_string(),
            ..SiteConfig::default()
        };
        repo.save_site_config(&config).await.unwrap();

        assert_eq!(resolve(&repo).await, config);
    }
}
