//! Common types for Markflow

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for email templates (opaque, client-generated)
pub type TemplateId = String;

/// Owning tenant identifier; partitions all queries and cache keys
pub type ClientId = String;

/// Lifecycle status of an email template.
///
/// Transitions are not enforced: any status can be set from any other via an
/// explicit update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStatus {
    Draft,
    Approved,
    Sent,
    Scheduled,
}

impl TemplateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateStatus::Draft => "draft",
            TemplateStatus::Approved => "approved",
            TemplateStatus::Sent => "sent",
            TemplateStatus::Scheduled => "scheduled",
        }
    }

    /// Parse from the stored string form. Unknown values fall back to draft.
    pub fn parse(s: &str) -> Self {
        match s {
            "approved" => TemplateStatus::Approved,
            "sent" => TemplateStatus::Sent,
            "scheduled" => TemplateStatus::Scheduled,
            _ => TemplateStatus::Draft,
        }
    }
}

impl std::fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-only engagement counters attached to a template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMetrics {
    #[serde(default)]
    pub opens: i64,
    #[serde(default)]
    pub clicks: i64,
    #[serde(default)]
    pub conversions: i64,
}

/// Tenant brand colors used by the styling post-processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColors {
    /// Primary color applied to headings, bold spans and buttons
    pub primary: String,
    /// Secondary color applied to anchors
    pub secondary: String,
}

impl Default for BrandColors {
    fn default() -> Self {
        Self {
            primary: "#1a1a2e".to_string(),
            secondary: "#e94560".to_string(),
        }
    }
}

/// Promotional payload embedded into generation prompts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Promotion {
    pub headline: String,
    #[serde(default)]
    pub discount: Option<String>,
    #[serde(default)]
    pub expires: Option<String>,
}

/// Product highlight payload embedded into generation prompts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductHighlight {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

///// The generation request: tenant identity plus content intent.
///
/// Pure input struct; no lifecycle.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationOptions {
    /// Usually supplied by the route path, not the body
    #[serde(default)]
    pub client_id: ClientId,
    pub client_name: String,
    #[serde(default)]
    pub industry: String,
    pub purpose: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default)]
    pub promotion: Option<Promotion>,
    #[serde(default)]
    pub product_highlight: Option<ProductHighlight>,
    #[serde(default)]
    pub additional_instructions: String,
    /// Overrides the configured brand profile colors when present
    #[serde(default)]
    pub brand_colors: Option<BrandColors>,
}

fn default_tone() -> String {
    "professional".to_string()
}

///// Generate a new template id: `email-{millis}-{random}`.
///
/// Uniqueness is best-effort (timestamp plus random suffix), not guaranteed.
pub fn new_template_id() -> TemplateId {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("email-{}-{}", Utc::now().timestamp_millis(), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_round_trip() {
        for status in [
            TemplateStatus::Draft,
            TemplateStatus::Approved,
            TemplateStatus::Sent,
            TemplateStatus::Scheduled,
        ] {
            assert_eq!(TemplateStatus::parse(status.as_str()), status);
        }
        assert_eq!(TemplateStatus::parse("garbage"), TemplateStatus::Draft);
    }

    #[test]
    fn test_template_id_shape() {
        let id = new_template_id();
        assert!(id.starts_with("email-"));
        assert_eq!(id.split('-').count(), 3);
    }

    #[test]
    fn test_metrics_default_to_zero() {
        let metrics: TemplateMetrics = serde_json::from_str("{}").unwrap();
        assert_eq!(metrics, TemplateMetrics::default());
    }
}
