//! Dual-write template store
//!
//! Writes go to the remote repository and to the local cache independently;
//! a remote failure degrades to cache-only persistence instead of surfacing
//! an error, so the caller always keeps a usable in-memory template. Reads
//! prefer the remote store and fall back to the cache when it errors.

use markflow_common::{Error, Result};
use tracing::warn;

use crate::cache::LocalTemplateCache;
use crate::models::{EmailTemplate, UpdateTemplate};
use crate::repository::TemplateRepository;

/// Template store combining the remote repository and the local cache
#[derive(Clone)]
pub struct TemplateStore {
    repository: Option<TemplateRepository>,
    cache: LocalTemplateCache,
}

impl TemplateStore {
    /// Create a store backed by both the repository and the cache
    pub fn new(repository: TemplateRepository, cache: LocalTemplateCache) -> Self {
        Self {
            repository: Some(repository),
            cache,
        }
    }

    /// Create a cache-only store (no remote database configured)
    pub fn cache_only(cache: LocalTemplateCache) -> Self {
        Self {
            repository: None,
            cache,
        }
    }

    /// Persist a template: remote insert attempted first, local write-through
    /// always. Neither failure is fatal; both failing still returns Ok so the
    /// caller can render the in-memory template.
    pub async fn save(&self, template: &EmailTemplate) -> Result<()> {
        if let Some(repo) = &self.repository {
            if let Err(e) = repo.insert(template).await {
                warn!(
                    template_id = %template.id,
                    client_id = %template.client_id,
                    error = %e,
                    "Remote template insert failed; keeping local copy only"
                );
            }
        }

        if let Err(e) = self.cache.upsert(template).await {
            warn!(
                template_id = %template.id,
                error = %e,
                "Local cache write failed"
            );
        }

        Ok(())
    }

    /// List templates for a client, most recent first.
    ///
    /// Remote errors fall back to the cache; the cache never becomes the
    /// primary source when the remote store is healthy.
    pub async fn list(&self, client_id: &str, limit: i64, offset: i64) -> Result<Vec<EmailTemplate>> {
        if let Some(repo) = &self.repository {
            match repo.list_by_client(client_id, limit, offset).await {
                Ok(templates) => return Ok(templates),
                Err(e) => {
                    warn!(client_id, error = %e, "Remote list failed; reading local cache");
                }
            }
        }

        let cached = self.cache.read(client_id).await?;
        let start = (offset.max(0) as usize).min(cached.len());
        let end = (start + limit.max(0) as usize).min(cached.len());
        Ok(cached[start..end].to_vec())
    }

    /// Count templates for a client
    pub async fn count(&self, client_id: &str) -> Result<i64> {
        if let Some(repo) = &self.repository {
            match repo.count_by_client(client_id).await {
                Ok(n) => return Ok(n),
                Err(e) => {
                    warn!(client_id, error = %e, "Remote count failed; counting local cache");
                }
            }
        }

        Ok(self.cache.read(client_id).await.unwrap_or_default().len() as i64)
    }

    /// Get a single template by id
    pub async fn get(&self, client_id: &str, id: &str) -> Result<Option<EmailTemplate>> {
        if let Some(repo) = &self.repository {
            match repo.get(client_id, id).await {
                Ok(Some(t)) => return Ok(Some(t)),
                Ok(None) => {}
                Err(e) => {
                    warn!(client_id, id, error = %e, "Remote get failed; reading local cache");
                }
            }
        }

        let cached = self.cache.read(client_id).await.unwrap_or_default();
        Ok(cached.into_iter().find(|t| t.id == id))
    }

    /// Update a template in both stores
    pub async fn update(
        &self,
        client_id: &str,
        id: &str,
        input: &UpdateTemplate,
    ) -> Result<EmailTemplate> {
        if let Some(repo) = &self.repository {
            match repo.update(client_id, id, input).await {
                Ok(Some(updated)) => {
                    if let Err(e) = self.cache.upsert(&updated).await {
                        warn!(id, error = %e, "Cache update failed after remote update");
                    }
                    return Ok(updated);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(client_id, id, error = %e, "Remote update failed; updating local cache");
                }
            }
        }

        // Cache-side update path
        let mut templates = self.cache.read(client_id).await?;
        let Some(existing) = templates.iter_mut().find(|t| t.id == id) else {
            return Err(Error::NotFound(format!("Template {} not found", id)));
        };

        if let Some(title) = &input.title {
            existing.title = title.clone();
        }
        if let Some(subject) = &input.subject {
            existing.subject = subject.clone();
        }
        if let Some(content) = &input.content {
            existing.content = content.clone();
        }
        if let Some(status) = input.status {
            existing.status = status.as_str().to_string();
        }
        if let Some(tags) = &input.tags {
            existing.tags = serde_json::json!(tags);
        }
        existing.scheduled_for = match existing.status.as_str() {
            "scheduled" => input.scheduled_for.or(existing.scheduled_for),
            _ => None,
        };

        let updated = existing.clone();
        self.cache.write(client_id, &templates).await?;
        Ok(updated)
    }

    /// Delete a template from both stores
    pub async fn delete(&self, client_id: &str, id: &str) -> Result<bool> {
        let mut removed = false;

        if let Some(repo) = &self.repository {
            match repo.delete(client_id, id).await {
                Ok(hit) => removed = hit,
                Err(e) => {
                    warn!(client_id, id, error = %e, "Remote delete failed; removing from cache");
                }
            }
        }

        let cached = self.cache.read(client_id).await.unwrap_or_default();
        if cached.iter().any(|t| t.id == id) {
            removed = true;
        }
        self.cache.remove(client_id, id).await?;

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateTemplate;
    use markflow_common::types::TemplateStatus;
    use pretty_assertions::assert_eq;

    fn cache_store(dir: &std::path::Path) -> TemplateStore {
        TemplateStore::cache_only(LocalTemplateCache::from_path(dir).unwrap())
    }

    fn template(client_id: &str, title: &str) -> EmailTemplate {
        CreateTemplate {
            client_id: client_id.into(),
            title: title.into(),
            subject: "subject".into(),
            content: "<p>body</p>".into(),
            tags: vec![],
        }
        .into_template()
    }

    #[tokio::test]
    async fn test_save_then_list_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = cache_store(dir.path());

        let t = template("acme", "One");
        store.save(&t).await.unwrap();

        let listed = store.list("acme", 50, 0).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, t.id);
    }

    #[tokio::test]
    async fn test_update_status_and_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let store = cache_store(dir.path());

        let t = template("acme", "One");
        store.save(&t).await.unwrap();

        let when = chrono::Utc::now() + chrono::Duration::days(1);
        let updated = store
            .update(
                "acme",
                &t.id,
                &UpdateTemplate {
                    status: Some(TemplateStatus::Scheduled),
                    scheduled_for: Some(when),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status_enum(), TemplateStatus::Scheduled);
        assert!(updated.scheduled_for.is_some());

        // Moving out of scheduled clears the date
        let updated = store
            .update(
                "acme",
                &t.id,
                &UpdateTemplate {
                    status: Some(TemplateStatus::Approved),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status_enum(), TemplateStatus::Approved);
        assert!(updated.scheduled_for.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = cache_store(dir.path());

        let err = store
            .update("acme", "email-0-missing", &UpdateTemplate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = cache_store(dir.path());

        let t = template("acme", "One");
        store.save(&t).await.unwrap();

        assert!(store.delete("acme", &t.id).await.unwrap());
        assert!(store.list("acme", 50, 0).await.unwrap().is_empty());
        assert!(!store.delete("acme", &t.id).await.unwrap());
    }
}
