//! Storage models

use chrono::{DateTime, Utc};
use markflow_common::types::{ClientId, TemplateId, TemplateMetrics, TemplateStatus};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Email template model
///
/// `tags` and `metrics` are stored as JSON and may arrive as JSON-encoded
/// strings from older writers; use [`EmailTemplate::tags_vec`] and
/// [`EmailTemplate::metrics`] for defensive decoding.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub id: TemplateId,
    pub client_id: ClientId,
    pub title: String,
    pub subject: String,
    pub content: String,
    pub status: String,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub tags: serde_json::Value,
    pub metrics: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl EmailTemplate {
    /// Get tags as a vector; decode failure yields an empty list
    pub fn tags_vec(&self) -> Vec<String> {
        decode_lenient(&self.tags).unwrap_or_default()
    }

    /// Get metrics; decode failure yields zeroed counters
    pub fn metrics(&self) -> TemplateMetrics {
        decode_lenient(&self.metrics).unwrap_or_default()
    }

    /// Get the status enum; unknown values fall back to draft
    pub fn status_enum(&self) -> TemplateStatus {
        TemplateStatus::parse(&self.status)
    }
}

/// Decode a JSON value that may itself be a JSON-encoded string.
fn decode_lenient<T: serde::de::DeserializeOwned>(value: &serde_json::Value) -> Option<T> {
    match value {
        serde_json::Value::String(s) => serde_json::from_str(s).ok(),
        other => serde_json::from_value(other.clone()).ok(),
    }
}

/// Input for creating a template
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplate {
    pub client_id: ClientId,
    pub title: String,
    pub subject: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input for updating a template; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTemplate {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub status: Option<TemplateStatus>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
}

impl CreateTemplate {
    /// Materialize a full template record with a fresh id and timestamp
    pub fn into_template(self) -> EmailTemplate {
        EmailTemplate {
            id: markflow_common::types::new_template_id(),
            client_id: self.client_id,
            title: self.title,
            subject: self.subject,
            content: self.content,
            status: TemplateStatus::Draft.as_str().to_string(),
            scheduled_for: None,
            tags: serde_json::json!(self.tags),
            metrics: serde_json::to_value(TemplateMetrics::default())
                .unwrap_or(serde_json::Value::Null),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_template() -> EmailTemplate {
        CreateTemplate {
            client_id: "acme".into(),
            title: "Welcome".into(),
            subject: "Hello".into(),
            content: "<p>Hi</p>".into(),
            tags: vec!["welcome".into()],
        }
        .into_template()
    }

    #[test]
    fn test_tags_decode_from_array_and_string() {
        let mut t = sample_template();
        assert_eq!(t.tags_vec(), vec!["welcome".to_string()]);

        // Some writers store tags as a JSON-encoded string
        t.tags = serde_json::Value::String(r#"["a","b"]"#.into());
        assert_eq!(t.tags_vec(), vec!["a".to_string(), "b".to_string()]);

        // Malformed payloads decode to empty, never fail the read
        t.tags = serde_json::Value::String("not json".into());
        assert_eq!(t.tags_vec(), Vec::<String>::new());
    }

    #[test]
    fn test_metrics_decode_defensively() {
        let mut t = sample_template();
        assert_eq!(t.metrics(), TemplateMetrics::default());

        t.metrics = serde_json::Value::String(r#"{"opens":3,"clicks":1,"conversions":0}"#.into());
        let m = t.metrics();
        assert_eq!(m.opens, 3);
        assert_eq!(m.clicks, 1);

        t.metrics = serde_json::Value::String("{broken".into());
        assert_eq!(t.metrics(), TemplateMetrics::default());
    }

    #[test]
    fn test_new_template_defaults() {
        let t = sample_template();
        assert_eq!(t.status_enum(), TemplateStatus::Draft);
        assert!(t.scheduled_for.is_none());
        assert!(t.id.starts_with("email-"));
    }
}
