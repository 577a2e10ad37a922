//! Local template cache
//!
//! Per-client JSON files used as a write-through fallback when the remote
//! store is unavailable. Last writer wins; the cache is non-authoritative.

use markflow_common::config::CacheConfig;
use markflow_common::{Error, Result};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use crate::models::EmailTemplate;

/// Per-client local template cache
#[derive(Clone)]
pub struct LocalTemplateCache {
    base_path: PathBuf,
}

impl LocalTemplateCache {
    /// Create a new cache rooted at the configured directory
    pub fn new(config: &CacheConfig) -> Result<Self> {
        Self::from_path(&config.dir)
    }

    /// Create a new cache rooted at the given path
    pub fn from_path(path: &std::path::Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .map_err(|e| Error::Storage(format!("Failed to create cache directory: {}", e)))?;

        debug!(path = %path.display(), "Initialized local template cache");

        Ok(Self {
            base_path: path.to_path_buf(),
        })
    }

    /// Cache file for a client: `email_templates_{client_id}.json`.
    ///
    /// The client id lands in a file name, so path separators and traversal
    /// sequences are rejected.
    fn file_for(&self, client_id: &str) -> Result<PathBuf> {
        if client_id.is_empty() {
            return Err(Error::InvalidInput("client_id is required".to_string()));
        }
        if client_id.contains("..") || client_id.contains('/') || client_id.contains('\\') {
            return Err(Error::Storage(format!(
                "Invalid client id for cache key: {}",
                client_id
            )));
        }
        Ok(self
            .base_path
            .join(format!("email_templates_{}.json", client_id)))
    }

    /// Read all cached templates for a client; a missing file is an empty list
    pub async fn read(&self, client_id: &str) -> Result<Vec<EmailTemplate>> {
        let path = self.file_for(client_id)?;

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::Storage(format!("Failed to read cache: {}", e))),
        };

        serde_json::from_slice(&data)
            .map_err(|e| Error::Parse(format!("Corrupt cache file for {}: {}", client_id, e)))
    }

    /// Replace the cached template list for a client
    pub async fn write(&self, client_id: &str, templates: &[EmailTemplate]) -> Result<()> {
        let path = self.file_for(client_id)?;
        let data = serde_json::to_vec(templates)
            .map_err(|e| Error::Internal(format!("Failed to encode cache: {}", e)))?;

        fs::write(&path, data)
            .await
            .map_err(|e| Error::Storage(format!("Failed to write cache: {}", e)))?;

        debug!(client_id, count = templates.len(), "Wrote template cache");
        Ok(())
    }

    /// Insert or replace a single template in the client's cached list.
    ///
    /// Read-then-write with no locking; concurrent writers for the same
    /// client race and the last writer wins.
    pub async fn upsert(&self, template: &EmailTemplate) -> Result<()> {
        let mut templates = self.read(&template.client_id).await.unwrap_or_default();
        templates.retain(|t| t.id != template.id);
        templates.insert(0, template.clone());
        self.write(&template.client_id, &templates).await
    }

    /// Remove a template from the client's cached list
    pub async fn remove(&self, client_id: &str, id: &str) -> Result<()> {
        let mut templates = self.read(client_id).await.unwrap_or_default();
        templates.retain(|t| t.id != id);
        self.write(client_id, &templates).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateTemplate;
    use pretty_assertions::assert_eq;

    fn template(client_id: &str, title: &str) -> EmailTemplate {
        CreateTemplate {
            client_id: client_id.into(),
            title: title.into(),
            subject: format!("{} subject", title),
            content: "<p>body</p>".into(),
            tags: vec!["catalog".into()],
        }
        .into_template()
    }

    #[tokio::test]
    async fn test_round_trip_by_client() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalTemplateCache::from_path(dir.path()).unwrap();

        let t = template("acme", "Launch");
        cache.upsert(&t).await.unwrap();

        let read = cache.read("acme").await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].id, t.id);
        assert_eq!(read[0].tags_vec(), vec!["catalog".to_string()]);
        assert_eq!(read[0].metrics(), Default::default());

        // Other clients see nothing
        assert!(cache.read("other").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalTemplateCache::from_path(dir.path()).unwrap();

        let mut t = template("acme", "Launch");
        cache.upsert(&t).await.unwrap();

        t.title = "Launch v2".into();
        cache.upsert(&t).await.unwrap();

        let read = cache.read("acme").await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].title, "Launch v2");
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalTemplateCache::from_path(dir.path()).unwrap();

        let t = template("acme", "Launch");
        cache.upsert(&t).await.unwrap();
        cache.remove("acme", &t.id).await.unwrap();

        assert!(cache.read("acme").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_traversal_in_client_id() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalTemplateCache::from_path(dir.path()).unwrap();

        assert!(cache.read("../etc/passwd").await.is_err());
        assert!(cache.read("a/b").await.is_err());
    }
}
