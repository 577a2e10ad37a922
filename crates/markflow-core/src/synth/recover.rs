//! Model output recovery
//!
//! The generation API returns free text with no format contract. Recovery is
//! an ordered list of parser strategies, each returning an optional success,
//! with an always-reachable deterministic fallback at the end. The outcome is
//! tagged so callers and tests can tell degraded output from clean output.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// A template draft recovered from model output, before layout and styling
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftTemplate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Tagged recovery outcome
#[derive(Debug, Clone)]
pub enum Recovery {
    /// Clean JSON parse of the model output
    Parsed(Vec<DraftTemplate>),
    /// Field-level extraction from labeled free text
    Recovered(Vec<DraftTemplate>),
    /// Deterministic placeholder content; the model output was unusable
    Fallback(Vec<DraftTemplate>),
}

impl Recovery {
    pub fn drafts(&self) -> &[DraftTemplate] {
        match self {
            Recovery::Parsed(d) | Recovery::Recovered(d) | Recovery::Fallback(d) => d,
        }
    }

    pub fn into_drafts(self) -> Vec<DraftTemplate> {
        match self {
            Recovery::Parsed(d) | Recovery::Recovered(d) | Recovery::Fallback(d) => d,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Recovery::Fallback(_))
    }
}

static JSON_ARRAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("static regex"));
static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("static regex"));
static TITLE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btitle\s*:").expect("static regex"));
static CHUNK_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?:```\w*|-{3,}|={3,})\s*$").expect("static regex"));
static TITLE_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?im)^\s*\**"?title"?\**\s*[:=]\s*(.+)$"#).expect("static regex"));
static SUBJECT_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?im)^\s*\**"?subject"?\**\s*[:=]\s*(.+)$"#).expect("static regex")
});
static CONTENT_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?ism)^\s*\**"?content"?\**\s*[:=]\s*(.+)\z"#).expect("static regex")
});
static TAGS_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?im)^\s*\**"?tags"?\**\s*[:=]\s*(.+)$"#).expect("static regex"));

/// Recover structured drafts from raw model output.
///
/// Strategies, attempted in order until one succeeds:
/// 1. top-level JSON array literal
/// 2. single JSON object literal, wrapped as a one-element result
/// 3. labeled-field extraction when `title:` markers are present
/// 4. deterministic fallback drafts, one per requested template
pub fn recover_templates(raw: &str, expected: usize, purpose: &str) -> Recovery {
    if let Some(drafts) = try_json_array(raw) {
        debug!(count = drafts.len(), "Recovered drafts from JSON array");
        return Recovery::Parsed(drafts);
    }

    if let Some(draft) = try_json_object(raw) {
        debug!("Recovered single draft from JSON object");
        return Recovery::Parsed(vec![draft]);
    }

    if TITLE_MARKER_RE.is_match(raw) {
        let drafts = extract_labeled_fields(raw);
        if !drafts.is_empty() {
            debug!(count = drafts.len(), "Recovered drafts from labeled text");
            return Recovery::Recovered(drafts);
        }
    }

    Recovery::Fallback(fallback_drafts(expected.max(1), purpose))
}

fn try_json_array(raw: &str) -> Option<Vec<DraftTemplate>> {
    let candidate = JSON_ARRAY_RE.find(raw)?.as_str();
    let drafts: Vec<DraftTemplate> = serde_json::from_str(candidate).ok()?;
    if drafts.is_empty() || drafts.iter().all(|d| d.title.is_empty() && d.content.is_empty()) {
        return None;
    }
    Some(drafts)
}

fn try_json_object(raw: &str) -> Option<DraftTemplate> {
    let candidate = JSON_OBJECT_RE.find(raw)?.as_str();
    let draft: DraftTemplate = serde_json::from_str(candidate).ok()?;
    if draft.title.is_empty() && draft.content.is_empty() {
        return None;
    }
    Some(draft)
}

fn extract_labeled_fields(raw: &str) -> Vec<DraftTemplate> {
    CHUNK_SPLIT_RE
        .split(raw)
        .filter_map(|chunk| {
            let title = first_capture(&TITLE_FIELD_RE, chunk)?;

            let subject =
                first_capture(&SUBJECT_FIELD_RE, chunk).unwrap_or_else(|| title.clone());
            let content = first_capture(&CONTENT_FIELD_RE, chunk)
                .unwrap_or_else(|| format!("<p>{}</p>", title));
            let tags = first_capture(&TAGS_FIELD_RE, chunk)
                .map(|line| {
                    line.split(',')
                        .map(|t| t.trim().trim_matches(['"', '[', ']']).to_string())
                        .filter(|t| !t.is_empty())
                        .collect()
                })
                .unwrap_or_default();

            Some(DraftTemplate {
                title,
                subject,
                content,
                tags,
            })
        })
        .collect()
}

fn first_capture(re: &Regex, chunk: &str) -> Option<String> {
    let value = re.captures(chunk)?.get(1)?.as_str();
    let value = value.trim().trim_matches(['"', ',']).trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn fallback_drafts(count: usize, purpose: &str) -> Vec<DraftTemplate> {
    (1..=count)
        .map(|n| DraftTemplate {
            title: format!("Draft {} ({})", n, purpose),
            subject: format!("A note about {}", purpose),
            content: concat!(
                "<p>We could not generate this email automatically. ",
                "This placeholder was created so you can edit it by hand.</p>"
            )
            .to_string(),
            tags: vec!["fallback".to_string(), "error".to_string()],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_array_is_parsed() {
        let raw = r#"Here you go:
[
  {"title": "A", "subject": "SA", "content": "<p>1</p>", "tags": ["x"]},
  {"title": "B", "subject": "SB", "content": "<p>2</p>"}
]
Hope that helps!"#;
        let recovery = recover_templates(raw, 2, "launch");
        assert!(matches!(recovery, Recovery::Parsed(_)));
        let drafts = recovery.into_drafts();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title, "A");
        assert_eq!(drafts[1].tags, Vec::<String>::new());
    }

    #[test]
    fn test_single_json_object_is_wrapped() {
        let raw = r#"{"title":"T","subject":"S","content":"<p>C</p>"}"#;
        let recovery = recover_templates(raw, 1, "launch");
        assert!(matches!(recovery, Recovery::Parsed(_)));
        let drafts = recovery.into_drafts();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].title, "T");
        assert_eq!(drafts[0].subject, "S");
        assert_eq!(drafts[0].content, "<p>C</p>");
    }

    #[test]
    fn test_labeled_text_is_recovered() {
        let raw = "Sure! Here are two drafts:\n\
---\n\
Title: Spring Sale\n\
Subject: 20% off everything\n\
Tags: sale, spring\n\
Content: <p>Big savings inside.</p>\n\
---\n\
Title: Follow Up\n\
Content: <p>Just checking in.</p>\n";
        let recovery = recover_templates(raw, 2, "sale");
        assert!(matches!(recovery, Recovery::Recovered(_)));
        let drafts = recovery.into_drafts();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title, "Spring Sale");
        assert_eq!(drafts[0].subject, "20% off everything");
        assert_eq!(drafts[0].tags, vec!["sale".to_string(), "spring".to_string()]);
        // Missing subject defaults to the title
        assert_eq!(drafts[1].subject, "Follow Up");
    }

    #[test]
    fn test_unusable_output_falls_back_and_never_panics() {
        let recovery = recover_templates("sorry, I can't help with that", 3, "newsletter");
        assert!(recovery.is_fallback());
        let drafts = recovery.into_drafts();
        assert_eq!(drafts.len(), 3);
        for draft in &drafts {
            assert!(draft.tags.contains(&"error".to_string()));
            assert!(draft.tags.contains(&"fallback".to_string()));
            assert!(!draft.content.is_empty());
        }
    }

    #[test]
    fn test_empty_output_falls_back() {
        let recovery = recover_templates("", 1, "welcome");
        assert!(recovery.is_fallback());
        assert_eq!(recovery.drafts().len(), 1);
    }

    #[test]
    fn test_malformed_json_array_falls_through() {
        // Broken array, but labeled fields are present further down
        let raw = "[{\"title\": broken}]\nTitle: Rescue\nContent: <p>ok</p>";
        let recovery = recover_templates(raw, 1, "x");
        assert!(matches!(recovery, Recovery::Recovered(_)));
        assert_eq!(recovery.drafts()[0].title, "Rescue");
    }
}
